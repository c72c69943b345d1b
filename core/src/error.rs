//! Error types for corpus loading and the build pass.

use std::path::PathBuf;
use thiserror::Error;

/// Problems with the raw corpus. Every variant aborts the build.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Corpus file could not be read
    #[error("failed to read corpus {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A corpus directory could not be walked completely
    #[error("failed to walk corpus directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Corpus is not valid JSON or has the wrong shape
    #[error("malformed corpus JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An entry lacks `number`, `title` or `content`
    #[error("corpus entry #{position} is missing `{field}`")]
    MissingField {
        /// Zero-based position of the entry in the corpus
        position: usize,
        /// Name of the missing field
        field: &'static str,
    },

    /// Document numbers must be positive and fit in 32 bits
    #[error("corpus entry #{position} has invalid number {number}")]
    InvalidNumber {
        /// Zero-based position of the entry in the corpus
        position: usize,
        /// The rejected number
        number: i64,
    },

    /// Two entries share the same number
    #[error("document number {number} appears more than once")]
    DuplicateNumber {
        /// The repeated number
        number: u32,
    },
}

/// Reasons the index builder refuses to emit artifacts.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Two documents share the same number
    #[error("document number {number} appears more than once")]
    DuplicateNumber {
        /// The repeated number
        number: u32,
    },

    /// Document number zero is reserved
    #[error("document number must be positive, got {number}")]
    InvalidNumber {
        /// The rejected number
        number: u32,
    },

    /// Theme assignment needs at least one theme
    #[error("theme list is empty")]
    EmptyThemes,
}
