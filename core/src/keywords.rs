use crate::tokenizer::normalize;
use std::collections::{HashMap, HashSet};

/// Most frequent non-stop-word terms of `text`, at most `limit` of them.
///
/// Ordered by descending count; equal counts keep the order in which the
/// terms first appear in the text.
pub fn extract_keywords(text: &str, stop_words: &HashSet<&str>, limit: usize) -> Vec<String> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, u32)> = Vec::new();
    for term in normalize(text) {
        if stop_words.contains(term.as_str()) {
            continue;
        }
        match slots.get(&term) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(term.clone(), counts.len());
                counts.push((term, 1));
            }
        }
    }
    // sort_by is stable, so first-seen order breaks ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(term, _)| term).collect()
}
