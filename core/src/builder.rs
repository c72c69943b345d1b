use crate::error::BuildError;
use crate::index::{DocNumber, Document, DocumentRecord, FullIndex, InvertedIndex};
use crate::keywords::extract_keywords;
use crate::tokenizer::{collapse_whitespace, normalize, strip_footnotes, DEFAULT_STOP_WORDS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Theme names in assignment order. A letter's theme is `THEMES[number % 12]`,
/// a coarse rotation rather than a content classification.
pub const DEFAULT_THEMES: &[&str] = &[
    "Time & Life", "Learning", "Friendship", "Death", "Philosophy", "Knowledge",
    "Society", "Solitude", "Virtue", "Self", "Character", "Aging",
];

pub const ELLIPSIS: &str = "...";

/// Knobs of the build pass. Any change requires a full rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Characters of content taken for the preview, before cleanup.
    pub preview_len: usize,
    /// Keywords extracted per document and fed to the inverted index.
    pub keyword_limit: usize,
    /// Leading keywords kept on each stored record.
    pub stored_keyword_limit: usize,
    pub stop_words: Vec<String>,
    pub themes: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            preview_len: 400,
            keyword_limit: 50,
            stored_keyword_limit: 20,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
            themes: DEFAULT_THEMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub fn theme_for(number: DocNumber, themes: &[String]) -> &str {
    &themes[number as usize % themes.len()]
}

/// First `len` characters of `content`, cleaned up and followed by an ellipsis.
pub fn make_preview(content: &str, len: usize) -> String {
    let head: String = content.chars().take(len).collect();
    let mut preview = collapse_whitespace(&strip_footnotes(&head));
    preview.push_str(ELLIPSIS);
    preview
}

/// Record for one document plus the terms it contributes to the index.
fn analyze(doc: &Document, config: &BuildConfig, stop_words: &HashSet<&str>) -> (DocumentRecord, InvertedIndex) {
    let keywords = extract_keywords(&doc.content, stop_words, config.keyword_limit);

    let mut terms = InvertedIndex::new();
    for keyword in &keywords {
        terms.insert(keyword, doc.number);
    }
    for word in normalize(&doc.title) {
        terms.insert(&word, doc.number);
    }

    let record = DocumentRecord {
        number: doc.number,
        title: strip_footnotes(&doc.title).trim().to_string(),
        preview: make_preview(&doc.content, config.preview_len),
        theme: theme_for(doc.number, &config.themes).to_string(),
        keywords: keywords.into_iter().take(config.stored_keyword_limit).collect(),
    };
    (record, terms)
}

fn validate(documents: &[Document], config: &BuildConfig) -> Result<(), BuildError> {
    if config.themes.is_empty() {
        return Err(BuildError::EmptyThemes);
    }
    let mut seen: HashSet<DocNumber> = HashSet::with_capacity(documents.len());
    for doc in documents {
        if doc.number == 0 {
            return Err(BuildError::InvalidNumber { number: doc.number });
        }
        if !seen.insert(doc.number) {
            return Err(BuildError::DuplicateNumber { number: doc.number });
        }
    }
    Ok(())
}

/// Build the full artifact from documents in corpus order.
///
/// The corpus is validated up front; on error nothing is produced.
pub fn build(documents: &[Document], config: &BuildConfig) -> Result<FullIndex, BuildError> {
    validate(documents, config)?;
    let stop_words: HashSet<&str> = config.stop_words.iter().map(String::as_str).collect();

    let full = documents.iter().fold(FullIndex::default(), |mut acc, doc| {
        let (record, terms) = analyze(doc, config, &stop_words);
        tracing::debug!(number = doc.number, keywords = record.keywords.len(), terms = terms.len(), "analyzed document");
        acc.documents.push(record);
        acc.index = acc.index.merge(terms);
        acc
    });

    tracing::info!(num_docs = full.documents.len(), num_terms = full.index.len(), "built inverted index");
    Ok(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(number: DocNumber, title: &str, content: &str) -> Document {
        Document { number, title: title.into(), content: content.into() }
    }

    #[test]
    fn theme_rotates_by_number() {
        let themes = BuildConfig::default().themes;
        assert_eq!(theme_for(1, &themes), "Learning");
        assert_eq!(theme_for(7, &themes), "Solitude");
        assert_eq!(theme_for(12, &themes), "Time & Life");
        assert_eq!(theme_for(124, &themes), "Philosophy");
    }

    #[test]
    fn preview_is_cleaned_and_always_marked() {
        assert_eq!(make_preview("Greetings[1]   to\n you", 400), "Greetings to you...");
        assert_eq!(make_preview("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn title_words_are_indexed_without_stop_word_filter() {
        let docs = vec![doc(5, "On the Philosopher's Mean[1]", "Nothing here repeats.")];
        let full = build(&docs, &BuildConfig::default()).unwrap();
        assert_eq!(full.documents[0].title, "On the Philosopher's Mean");
        assert_eq!(full.index.get("the"), Some(&[5][..]));
        assert_eq!(full.index.get("philosopher"), Some(&[5][..]));
        assert_eq!(full.index.get("mean"), Some(&[5][..]));
        assert!(!full.index.contains_term("on"));
    }

    #[test]
    fn index_uses_all_keywords_but_record_stores_prefix() {
        let content: String = (0..30).map(|i| format!("term{i:02} ")).collect();
        let full = build(&[doc(1, "Untitled", &content)], &BuildConfig::default()).unwrap();
        assert_eq!(full.documents[0].keywords.len(), 20);
        assert_eq!(full.index.get("term29"), Some(&[1][..]));
    }

    #[test]
    fn rejects_duplicate_numbers() {
        let docs = vec![doc(1, "A letter", "text"), doc(1, "Another", "text")];
        let err = build(&docs, &BuildConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateNumber { number: 1 }));
    }

    #[test]
    fn rejects_empty_theme_list() {
        let config = BuildConfig { themes: vec![], ..BuildConfig::default() };
        let err = build(&[doc(1, "A", "b")], &config).unwrap_err();
        assert!(matches!(err, BuildError::EmptyThemes));
    }
}
