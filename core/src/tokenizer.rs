use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

/// Tokens shorter than this are never indexed nor matched.
pub const MIN_TERM_LEN: usize = 3;

/// English function words excluded from keyword extraction.
///
/// Changing this list changes stored keywords, so artifacts must be rebuilt.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were",
    "been", "be", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "must", "can", "of", "to", "in", "for",
    "with", "by", "from", "about", "into", "through", "during", "before", "after",
];

lazy_static! {
    static ref FOOTNOTE: Regex = Regex::new(r"\[[0-9]+\]").expect("valid regex");
    static ref NON_TERM: Regex = Regex::new(r"[^a-z0-9\s]").expect("valid regex");
}

/// Remove bracketed numeric footnote markers such as `[12]`.
pub fn strip_footnotes(text: &str) -> Cow<'_, str> {
    FOOTNOTE.replace_all(text, "")
}

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn long_enough(token: &str) -> bool {
    token.chars().count() >= MIN_TERM_LEN
}

/// Normalize text into index terms: lowercase, drop footnote markers, replace
/// anything outside `[a-z0-9]` and whitespace with a space, split, and drop
/// tokens shorter than [`MIN_TERM_LEN`].
pub fn normalize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let without_notes = strip_footnotes(&lowered);
    let cleaned = NON_TERM.replace_all(&without_notes, " ");
    cleaned
        .split_whitespace()
        .filter(|t| long_enough(t))
        .map(str::to_string)
        .collect()
}

/// Split a raw search string into query words.
///
/// Unlike [`normalize`], punctuation is kept: a query word is matched as a
/// substring against titles and keywords, and looked up verbatim in the index.
pub fn query_words(query: &str) -> Vec<String> {
    query
        .trim()
        .to_lowercase()
        .split_whitespace()
        .filter(|t| long_enough(t))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_normalize() {
        let t = normalize("On Death[3], and DYING!");
        assert_eq!(t, vec!["death", "and", "dying"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \n\t ").is_empty());
        assert!(query_words("  ").is_empty());
    }

    #[test]
    fn footnotes_removed_anywhere() {
        assert_eq!(strip_footnotes("a[1]b [23] c[x]"), "ab  c[x]");
    }
}
