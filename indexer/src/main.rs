use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use epistula_core::builder::{build, BuildConfig};
use epistula_core::corpus::{corpus_files, load_corpus};
use epistula_core::library::{build_library, LibraryConfig};
use epistula_core::persist::{load_library_config, save_artifacts, ArtifactSet, ArtifactSizes, IndexPaths, MetaFile};
use epistula_core::split;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build the letter search artifacts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full, light and library artifacts from a corpus
    Build {
        /// Corpus file, or a directory of corpus JSON files
        #[arg(long)]
        input: PathBuf,
        /// Output artifact directory
        #[arg(long, default_value = "./public")]
        output: PathBuf,
        /// Curated collections and timeline; enables the library index
        #[arg(long)]
        library: Option<PathBuf>,
        /// Characters of content used for previews
        #[arg(long, default_value_t = 400)]
        preview_len: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, library, preview_len } => {
            let config = BuildConfig { preview_len, ..BuildConfig::default() };
            build_artifacts(&input, &output, library.as_deref(), &config)
        }
    }
}

fn build_artifacts(input: &Path, output: &Path, library: Option<&Path>, config: &BuildConfig) -> Result<()> {
    let library_config: Option<LibraryConfig> = library
        .map(|p| load_library_config(p).with_context(|| format!("loading library config {}", p.display())))
        .transpose()?;

    let documents = load_corpus(input).with_context(|| format!("loading corpus {}", input.display()))?;
    tracing::info!(num_docs = documents.len(), "loaded corpus");

    let full = build(&documents, config).context("building index")?;
    let (full, light) = split(full);
    let library_index = library_config.as_ref().map(|lc| build_library(&documents, config, lc));
    let meta = MetaFile::for_build(&full);

    let paths = IndexPaths::new(output);
    let sizes = save_artifacts(&paths, &ArtifactSet { full: &full, light: &light, library: library_index.as_ref(), meta: &meta })?;

    report_sizes(input, &sizes);
    if let Some(idx) = &library_index {
        tracing::info!(
            letters = idx.letters.len(),
            collections = idx.collections.len(),
            timeline_periods = idx.timeline.len(),
            by_difficulty = ?idx.count_by_difficulty(),
            by_length = ?idx.count_by_length(),
            "library index written"
        );
    }
    tracing::info!(output = %output.display(), num_terms = meta.num_terms, "index build complete");
    Ok(())
}

/// Combined size of the files `load_corpus` reads.
fn corpus_size(input: &Path) -> u64 {
    match corpus_files(input) {
        Ok(files) => files.iter().filter_map(|f| fs::metadata(f).ok()).map(|m| m.len()).sum(),
        Err(e) => {
            tracing::warn!(error = %e, "could not measure corpus size");
            0
        }
    }
}

fn kib(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

fn report_sizes(input: &Path, sizes: &ArtifactSizes) {
    let original = corpus_size(input);
    let (full_pct, light_reduction) = if original > 0 {
        let o = original as f64;
        (sizes.full as f64 / o * 100.0, (1.0 - sizes.light as f64 / o) * 100.0)
    } else {
        (0.0, 0.0)
    };
    tracing::info!(
        original = %kib(original),
        full = %kib(sizes.full),
        light = %kib(sizes.light),
        library = ?sizes.library.map(kib),
        full_pct = %format!("{full_pct:.1}%"),
        light_reduction = %format!("{light_reduction:.1}%"),
        "artifact sizes"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_size_counts_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("book1")).unwrap();
        fs::write(dir.path().join("top.json"), "[]").unwrap();
        fs::write(dir.path().join("book1/letters.json"), "[ ]").unwrap();
        fs::write(dir.path().join("book1/readme.txt"), "not counted").unwrap();
        assert_eq!(corpus_size(dir.path()), 5);
    }
}
