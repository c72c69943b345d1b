use crate::index::{DocNumber, DocumentRecord, FullIndex};
use crate::tokenizer::query_words;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Additive score contributions. Empirical values, not tuned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Per query word found as an index key listing the document.
    pub index_hit: u32,
    /// Whole query appears in the title.
    pub title_phrase: u32,
    /// Per query word appearing in the title.
    pub title_word: u32,
    /// Every query word appears inside some stored keyword.
    pub all_words_in_keywords: u32,
    /// Whole query appears in the theme name.
    pub theme_phrase: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self { index_hit: 1, title_phrase: 10, title_word: 3, all_words_in_keywords: 5, theme_phrase: 2 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: usize,
    pub offset: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { limit: Self::DEFAULT_LIMIT, offset: 0 }
    }
}

impl Pagination {
    pub const DEFAULT_LIMIT: usize = 50;

    /// Parse raw request values. Missing, non-numeric or negative inputs fall
    /// back to the defaults instead of failing the request.
    pub fn from_raw(limit: Option<&str>, offset: Option<&str>) -> Self {
        Self {
            limit: parse_or(limit, "limit", Self::DEFAULT_LIMIT),
            offset: parse_or(offset, "offset", 0),
        }
    }
}

fn parse_or(raw: Option<&str>, name: &str, default: usize) -> usize {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else { return default };
    match raw.parse::<i64>() {
        Ok(v) if v >= 0 => usize::try_from(v).unwrap_or(default),
        _ => {
            tracing::warn!(param = name, value = raw, default, "invalid pagination parameter, using default");
            default
        }
    }
}

/// A matched document and its score, alive only for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredResult<'a> {
    pub record: &'a DocumentRecord,
    pub score: u32,
}

/// What callers see of a result. Scores stay internal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultView {
    pub number: DocNumber,
    pub title: String,
    pub preview: String,
    pub theme: String,
}

impl From<&DocumentRecord> for ResultView {
    fn from(r: &DocumentRecord) -> Self {
        Self { number: r.number, title: r.title.clone(), preview: r.preview.clone(), theme: r.theme.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<ResultView>,
    pub total: usize,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub limit: Option<usize>,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self { results: vec![], total: 0, query: String::new(), offset: None, limit: None }
    }
}

/// Score every document against `query` and return the non-zero ones, best
/// first. Equal scores keep artifact order.
pub fn score_documents<'a>(query: &str, artifact: &'a FullIndex, weights: &ScoringWeights) -> Vec<ScoredResult<'a>> {
    let phrase = query.trim().to_lowercase();
    if phrase.is_empty() {
        return vec![];
    }
    let words = query_words(&phrase);

    let mut hits: HashMap<DocNumber, u32> = HashMap::new();
    for word in &words {
        if let Some(numbers) = artifact.index.get(word) {
            for &n in numbers {
                let hit = hits.entry(n).or_insert(0);
                *hit = hit.saturating_add(weights.index_hit);
            }
        }
    }

    let mut scored: Vec<ScoredResult<'a>> = artifact
        .documents
        .iter()
        .filter_map(|record| {
            let mut score = hits.get(&record.number).copied().unwrap_or(0);
            let title = record.title.to_lowercase();
            if title.contains(&phrase) {
                score = score.saturating_add(weights.title_phrase);
            }
            let title_words = words.iter().filter(|w| title.contains(w.as_str())).count() as u32;
            score = score.saturating_add(weights.title_word.saturating_mul(title_words));
            // vacuously true when every query word was too short to keep
            if words.iter().all(|w| record.keywords.iter().any(|k| k.contains(w.as_str()))) {
                score = score.saturating_add(weights.all_words_in_keywords);
            }
            if record.theme.to_lowercase().contains(&phrase) {
                score = score.saturating_add(weights.theme_phrase);
            }
            (score > 0).then_some(ScoredResult { record, score })
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Ranked, paginated search over the full artifact.
pub fn search(query: &str, artifact: &FullIndex, page: Pagination, weights: &ScoringWeights) -> SearchPage {
    let phrase = query.trim().to_lowercase();
    if phrase.is_empty() {
        return SearchPage::empty();
    }
    let scored = score_documents(&phrase, artifact, weights);
    let total = scored.len();
    let results = scored.iter().skip(page.offset).take(page.limit).map(|s| ResultView::from(s.record)).collect();
    tracing::debug!(query = %phrase, total, offset = page.offset, limit = page.limit, "scored query");
    SearchPage { results, total, query: phrase, offset: Some(page.offset), limit: Some(page.limit) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_on_bad_input() {
        assert_eq!(Pagination::from_raw(None, None), Pagination { limit: 50, offset: 0 });
        assert_eq!(Pagination::from_raw(Some("abc"), Some("-3")), Pagination { limit: 50, offset: 0 });
        assert_eq!(Pagination::from_raw(Some(" 10 "), Some("20")), Pagination { limit: 10, offset: 20 });
        assert_eq!(Pagination::from_raw(Some("0"), Some("")), Pagination { limit: 0, offset: 0 });
    }

    #[test]
    fn empty_query_is_not_an_error() {
        let page = search("   ", &FullIndex::default(), Pagination::default(), &ScoringWeights::default());
        assert_eq!(page, SearchPage::empty());
        let json = serde_json::to_string(&page).unwrap();
        assert_eq!(json, r#"{"results":[],"total":0,"query":""}"#);
    }

    #[test]
    fn huge_weights_saturate_instead_of_overflowing() {
        let mut full = FullIndex::default();
        full.index.insert("death", 2);
        full.documents.push(DocumentRecord {
            number: 2,
            title: "Death death death".into(),
            preview: String::new(),
            theme: "Death".into(),
            keywords: vec!["death".into()],
        });
        let weights = ScoringWeights { index_hit: u32::MAX, title_phrase: u32::MAX, title_word: u32::MAX, all_words_in_keywords: u32::MAX, theme_phrase: u32::MAX };
        let scored = score_documents("death death", &full, &weights);
        assert_eq!(scored[0].score, u32::MAX);
    }
}
