//! Light artifact: the preview-only projection of the full index.

use crate::index::{DocNumber, DocumentRecord, FullIndex};
use serde::{Deserialize, Serialize};

/// Record fields needed to render a result list, without keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightRecord {
    #[serde(rename = "n")]
    pub number: DocNumber,
    #[serde(rename = "t")]
    pub title: String,
    #[serde(rename = "p")]
    pub preview: String,
    #[serde(rename = "th")]
    pub theme: String,
}

impl From<&DocumentRecord> for LightRecord {
    fn from(r: &DocumentRecord) -> Self {
        Self { number: r.number, title: r.title.clone(), preview: r.preview.clone(), theme: r.theme.clone() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightIndex {
    #[serde(rename = "letters")]
    pub documents: Vec<LightRecord>,
}

impl From<&FullIndex> for LightIndex {
    fn from(full: &FullIndex) -> Self {
        Self { documents: full.documents.iter().map(LightRecord::from).collect() }
    }
}

/// Pair the full artifact with its light view. Nothing is recomputed.
pub fn split(full: FullIndex) -> (FullIndex, LightIndex) {
    let light = LightIndex::from(&full);
    (full, light)
}
