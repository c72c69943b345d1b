//! Keyword search over a fixed corpus of letters.
//!
//! The offline half ([`builder`], [`artifact`], [`library`], [`persist`])
//! turns documents into JSON artifacts; the online half ([`search`]) ranks
//! documents against a query using only the full artifact.

pub mod artifact;
pub mod builder;
pub mod corpus;
pub mod error;
pub mod index;
pub mod keywords;
pub mod library;
pub mod persist;
pub mod search;
pub mod tokenizer;

pub use artifact::{split, LightIndex, LightRecord};
pub use builder::{build, BuildConfig};
pub use error::{BuildError, CorpusError};
pub use index::{DocNumber, Document, DocumentRecord, FullIndex, InvertedIndex, TermId};
pub use search::{search, Pagination, ScoredResult, ScoringWeights, SearchPage};
