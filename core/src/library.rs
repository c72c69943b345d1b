//! Browsing metadata for the letter library: reading length, difficulty,
//! curated collections and the period each letter was written in.
//!
//! Collections and periods are editorial data loaded from a [`LibraryConfig`];
//! length and difficulty are cheap heuristics over the text.

use crate::builder::{make_preview, theme_for, BuildConfig};
use crate::index::{DocNumber, Document};
use crate::tokenizer::strip_footnotes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const ADVANCED_MARKERS: &[&str] = &["metaphysics", "dialectic", "syllogism", "proposition", "categorical", "premise"];
const PHILOSOPHICAL_MARKERS: &[&str] = &["virtue", "stoic", "philosophy", "wisdom", "ethics", "moral"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthClass {
    Short,
    Medium,
    Long,
}

impl LengthClass {
    pub fn from_word_count(words: usize) -> Self {
        match words {
            0..=799 => LengthClass::Short,
            800..=1499 => LengthClass::Medium,
            _ => LengthClass::Long,
        }
    }
}

/// A curated reading list. Serialized as an entry of the `collections`
/// object, keyed by `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub name: String,
    pub letters: Vec<DocNumber>,
    pub description: String,
    pub difficulty: Difficulty,
}

/// `collections` as a JSON object keyed by name, in configuration order.
mod collection_map {
    use super::{Collection, Difficulty};
    use crate::index::DocNumber;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    #[derive(Serialize)]
    struct BodyRef<'a> {
        letters: &'a [DocNumber],
        description: &'a str,
        difficulty: Difficulty,
    }

    #[derive(Deserialize)]
    struct Body {
        letters: Vec<DocNumber>,
        #[serde(default)]
        description: String,
        difficulty: Difficulty,
    }

    pub fn serialize<S: Serializer>(collections: &[Collection], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(collections.len()))?;
        for c in collections {
            map.serialize_entry(&c.name, &BodyRef { letters: &c.letters, description: &c.description, difficulty: c.difficulty })?;
        }
        map.end()
    }

    struct CollectionsVisitor;

    impl<'de> Visitor<'de> for CollectionsVisitor {
        type Value = Vec<Collection>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of collection name to definition")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut out = Vec::new();
            while let Some((name, body)) = access.next_entry::<String, Body>()? {
                out.push(Collection { name, letters: body.letters, description: body.description, difficulty: body.difficulty });
            }
            Ok(out)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Collection>, D::Error> {
        deserializer.deserialize_map(CollectionsVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePeriod {
    pub year: String,
    pub season: String,
    pub letters: Vec<DocNumber>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    #[serde(with = "collection_map")]
    pub collections: Vec<Collection>,
    pub timeline: Vec<TimelinePeriod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterMeta {
    pub length: LengthClass,
    pub difficulty: Difficulty,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSlot {
    pub year: String,
    pub season: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub n: DocNumber,
    pub t: String,
    pub p: String,
    pub th: String,
    pub meta: LetterMeta,
    pub collections: Vec<String>,
    pub timeline: Option<TimelineSlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryIndex {
    pub letters: Vec<LibraryEntry>,
    #[serde(with = "collection_map")]
    pub collections: Vec<Collection>,
    pub timeline: Vec<TimelinePeriod>,
}

impl LibraryIndex {
    pub fn count_by_difficulty(&self) -> BTreeMap<Difficulty, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.letters {
            *counts.entry(entry.meta.difficulty).or_insert(0) += 1;
        }
        counts
    }

    pub fn count_by_length(&self) -> BTreeMap<LengthClass, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.letters {
            *counts.entry(entry.meta.length).or_insert(0) += 1;
        }
        counts
    }
}

fn occurrences(haystack: &str, markers: &[&str]) -> usize {
    markers.iter().map(|m| haystack.matches(m).count()).sum()
}

/// Pieces left after splitting on whitespace runs, counting the empty pieces
/// before leading and after trailing whitespace. Empty text counts as one.
pub fn word_count(content: &str) -> usize {
    let mut runs = 0;
    let mut in_run = false;
    for c in content.chars() {
        let ws = c.is_whitespace();
        if ws && !in_run {
            runs += 1;
        }
        in_run = ws;
    }
    runs + 1
}

pub fn letter_meta(number: DocNumber, content: &str) -> LetterMeta {
    let word_count = word_count(content);
    let lowered = content.to_lowercase();
    let advanced = occurrences(&lowered, ADVANCED_MARKERS);
    let philosophical = occurrences(&lowered, PHILOSOPHICAL_MARKERS);

    let difficulty = if advanced > 2 || number > 100 {
        Difficulty::Advanced
    } else if philosophical > 5 || number > 60 {
        Difficulty::Intermediate
    } else {
        Difficulty::Beginner
    };
    LetterMeta { length: LengthClass::from_word_count(word_count), difficulty, word_count }
}

/// Build the library index. Expects documents already accepted by [`crate::builder::build`].
pub fn build_library(documents: &[Document], build: &BuildConfig, library: &LibraryConfig) -> LibraryIndex {
    let letters = documents
        .iter()
        .map(|doc| LibraryEntry {
            n: doc.number,
            t: strip_footnotes(&doc.title).trim().to_string(),
            p: make_preview(&doc.content, build.preview_len),
            th: theme_for(doc.number, &build.themes).to_string(),
            meta: letter_meta(doc.number, &doc.content),
            collections: library
                .collections
                .iter()
                .filter(|c| c.letters.contains(&doc.number))
                .map(|c| c.name.clone())
                .collect(),
            timeline: library
                .timeline
                .iter()
                .find(|p| p.letters.contains(&doc.number))
                .map(|p| TimelineSlot { year: p.year.clone(), season: p.season.clone() }),
        })
        .collect();

    LibraryIndex { letters, collections: library.collections.clone(), timeline: library.timeline.clone() }
}
