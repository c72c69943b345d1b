use crate::error::CorpusError;
use crate::index::{DocNumber, Document};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Entry as it appears on disk; every field is checked before it becomes a [`Document`].
#[derive(Debug, Deserialize)]
struct RawEntry {
    number: Option<i64>,
    title: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    Wrapped { letters: Vec<RawEntry> },
    Bare(Vec<RawEntry>),
}

impl CorpusFile {
    fn into_entries(self) -> Vec<RawEntry> {
        match self {
            CorpusFile::Wrapped { letters } => letters,
            CorpusFile::Bare(entries) => entries,
        }
    }
}

fn validate_entry(position: usize, raw: RawEntry) -> Result<Document, CorpusError> {
    let number = raw.number.ok_or(CorpusError::MissingField { position, field: "number" })?;
    let title = raw.title.ok_or(CorpusError::MissingField { position, field: "title" })?;
    let content = raw.content.ok_or(CorpusError::MissingField { position, field: "content" })?;
    let number = DocNumber::try_from(number)
        .ok()
        .filter(|&n| n > 0)
        .ok_or(CorpusError::InvalidNumber { position, number })?;
    Ok(Document { number, title, content })
}

fn collect_documents(entries: Vec<RawEntry>, first_position: usize) -> Result<Vec<Document>, CorpusError> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, raw)| validate_entry(first_position + i, raw))
        .collect()
}

fn ensure_unique(documents: &[Document]) -> Result<(), CorpusError> {
    let mut seen = HashSet::with_capacity(documents.len());
    for doc in documents {
        if !seen.insert(doc.number) {
            return Err(CorpusError::DuplicateNumber { number: doc.number });
        }
    }
    Ok(())
}

/// Parse a corpus from JSON, either `{"letters": [...]}` or a bare array.
pub fn parse_corpus(json: &str) -> Result<Vec<Document>, CorpusError> {
    let file: CorpusFile = serde_json::from_str(json)?;
    let documents = collect_documents(file.into_entries(), 0)?;
    ensure_unique(&documents)?;
    Ok(documents)
}

/// Corpus files to read: the path itself, or every `.json` file under a
/// directory in sorted path order. An unreadable entry fails the walk.
pub fn corpus_files(path: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).follow_links(true) {
        let entry = entry?;
        let p = entry.path();
        if entry.file_type().is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(p.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Load documents from a corpus file, or from every `.json` file under a
/// directory in sorted path order. Any bad entry fails the whole load.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<Document>, CorpusError> {
    let mut documents = Vec::new();
    for file in corpus_files(path.as_ref())? {
        let text = fs::read_to_string(&file).map_err(|source| CorpusError::Io { path: file.clone(), source })?;
        let parsed: CorpusFile = serde_json::from_str(&text)?;
        let batch = collect_documents(parsed.into_entries(), documents.len())?;
        tracing::debug!(file = %file.display(), documents = batch.len(), "read corpus file");
        documents.extend(batch);
    }
    ensure_unique(&documents)?;
    Ok(documents)
}
