use crate::artifact::LightIndex;
use crate::index::FullIndex;
use crate::library::{LibraryConfig, LibraryIndex};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: u32,
    pub created_at: String,
    pub version: u32,
}

impl MetaFile {
    pub fn for_build(full: &FullIndex) -> Self {
        Self {
            num_docs: full.documents.len() as u32,
            num_terms: full.index.len() as u32,
            created_at: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_default(),
            version: FORMAT_VERSION,
        }
    }
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn full(&self) -> PathBuf { self.root.join("search-index-full.json") }
    pub fn light(&self) -> PathBuf { self.root.join("search-index-light.json") }
    pub fn library(&self) -> PathBuf { self.root.join("enhanced-index.json") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

/// Outputs of one build pass, written together or not at all.
pub struct ArtifactSet<'a> {
    pub full: &'a FullIndex,
    pub light: &'a LightIndex,
    pub library: Option<&'a LibraryIndex>,
    pub meta: &'a MetaFile,
}

/// Byte sizes of what was written.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactSizes {
    pub full: u64,
    pub light: u64,
    pub library: Option<u64>,
}

/// Serialize everything, stage each file under a temporary name, then rename
/// into place. A library index left over from an earlier build is removed
/// when this build has none.
pub fn save_artifacts(paths: &IndexPaths, set: &ArtifactSet<'_>) -> Result<ArtifactSizes> {
    let full = serde_json::to_vec(set.full)?;
    let light = serde_json::to_vec(set.light)?;
    let library = set.library.map(|l| serde_json::to_vec(l)).transpose()?;
    let meta = serde_json::to_string_pretty(set.meta)?.into_bytes();

    create_dir_all(&paths.root).with_context(|| format!("creating {}", paths.root.display()))?;
    let mut outputs: Vec<(PathBuf, &[u8])> = vec![(paths.full(), full.as_slice()), (paths.light(), light.as_slice())];
    if let Some(bytes) = &library {
        outputs.push((paths.library(), bytes.as_slice()));
    }
    outputs.push((paths.meta(), meta.as_slice()));

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(outputs.len());
    for (target, bytes) in outputs {
        let tmp = staging_path(&target);
        if let Err(e) = write_file(&tmp, bytes) {
            discard(&staged);
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        staged.push((tmp, target));
    }

    if library.is_none() {
        remove_if_present(&paths.library())?;
    }
    for (tmp, target) in &staged {
        fs::rename(tmp, target).with_context(|| format!("moving {} into place", target.display()))?;
    }

    Ok(ArtifactSizes { full: full.len() as u64, light: light.len() as u64, library: library.map(|b| b.len() as u64) })
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        let _ = fs::remove_file(tmp);
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("removing stale {}", path.display())),
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(value)
}

pub fn load_full(paths: &IndexPaths) -> Result<FullIndex> { load_json(&paths.full()) }

pub fn load_light(paths: &IndexPaths) -> Result<LightIndex> { load_json(&paths.light()) }

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> { load_json(&paths.meta()) }

/// The library index is optional; `None` when it was not built.
pub fn load_library(paths: &IndexPaths) -> Result<Option<LibraryIndex>> {
    let path = paths.library();
    if !path.exists() {
        return Ok(None);
    }
    load_json(&path).map(Some)
}

pub fn load_library_config<P: AsRef<Path>>(path: P) -> Result<LibraryConfig> { load_json(path.as_ref()) }
