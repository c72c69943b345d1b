use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

pub type TermId = u32;
/// Stable, corpus-assigned document number (1..=N).
pub type DocNumber = u32;

/// A letter as supplied by the corpus loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub number: DocNumber,
    pub title: String,
    pub content: String,
}

/// Per-document record stored in the full artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(rename = "n")]
    pub number: DocNumber,
    #[serde(rename = "t")]
    pub title: String,
    #[serde(rename = "p")]
    pub preview: String,
    #[serde(rename = "th")]
    pub theme: String,
    /// Top terms by frequency, most frequent first.
    #[serde(rename = "k", default)]
    pub keywords: Vec<String>,
}

/// Term to document numbers, in the order terms and documents were first seen.
///
/// Terms live in an arena addressed by [`TermId`]; postings hold document
/// numbers only, never copies of the records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    dictionary: HashMap<String, TermId>,
    terms: Vec<String>,
    postings: Vec<Vec<DocNumber>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Record that `number` contains `term`. A number is listed at most once per term.
    pub fn insert(&mut self, term: &str, number: DocNumber) {
        let tid = match self.dictionary.get(term) {
            Some(&tid) => tid,
            None => {
                let tid = self.terms.len() as TermId;
                self.dictionary.insert(term.to_string(), tid);
                self.terms.push(term.to_string());
                self.postings.push(Vec::new());
                tid
            }
        };
        let list = &mut self.postings[tid as usize];
        if !list.contains(&number) {
            list.push(number);
        }
    }

    /// Fold `other` into `self`, appending unseen terms and numbers after existing ones.
    pub fn merge(mut self, other: InvertedIndex) -> Self {
        for (term, numbers) in other.terms.into_iter().zip(other.postings) {
            for number in numbers {
                self.insert(&term, number);
            }
        }
        self
    }

    pub fn get(&self, term: &str) -> Option<&[DocNumber]> {
        self.dictionary.get(term).map(|&tid| self.postings[tid as usize].as_slice())
    }

    pub fn contains_term(&self, term: &str) -> bool { self.dictionary.contains_key(term) }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    /// Terms with their postings, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DocNumber])> {
        self.terms.iter().map(String::as_str).zip(self.postings.iter().map(Vec::as_slice))
    }
}

impl Serialize for InvertedIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.terms.len()))?;
        for (term, numbers) in self.iter() {
            map.serialize_entry(term, numbers)?;
        }
        map.end()
    }
}

struct InvertedIndexVisitor;

impl<'de> Visitor<'de> for InvertedIndexVisitor {
    type Value = InvertedIndex;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of term to document numbers")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut index = InvertedIndex::new();
        while let Some((term, numbers)) = access.next_entry::<String, Vec<DocNumber>>()? {
            for number in numbers {
                index.insert(&term, number);
            }
        }
        Ok(index)
    }
}

impl<'de> Deserialize<'de> for InvertedIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(InvertedIndexVisitor)
    }
}

/// Everything the query scorer needs: records plus the inverted index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullIndex {
    #[serde(rename = "letters")]
    pub documents: Vec<DocumentRecord>,
    pub index: InvertedIndex,
}

impl FullIndex {
    pub fn record(&self, number: DocNumber) -> Option<&DocumentRecord> {
        self.documents.iter().find(|r| r.number == number)
    }
}
