use epistula_core::builder::BuildConfig;
use epistula_core::library::{build_library, Difficulty, LibraryConfig};
use epistula_core::Document;

const SHIPPED: &str = include_str!("../../config/library.json");

#[test]
fn shipped_library_config_parses() {
    let config: LibraryConfig = serde_json::from_str(SHIPPED).unwrap();
    assert_eq!(config.collections.len(), 8);
    assert_eq!(config.timeline.len(), 7);
    assert_eq!(config.collections[6].difficulty, Difficulty::Advanced);
    let covered: usize = config.timeline.iter().map(|p| p.letters.len()).sum();
    assert_eq!(covered, 124);
}

#[test]
fn late_letter_lands_in_last_period() {
    let config: LibraryConfig = serde_json::from_str(SHIPPED).unwrap();
    let docs = vec![Document { number: 124, title: "On the True Good as Attained by Reason".into(), content: "I can hand on to you many maxims.".into() }];
    let idx = build_library(&docs, &BuildConfig::default(), &config);
    let entry = &idx.letters[0];
    assert_eq!(entry.collections, vec!["Advanced Stoicism"]);
    assert_eq!(entry.timeline.as_ref().unwrap().season, "Last Letters");
    assert_eq!(entry.meta.difficulty, Difficulty::Advanced);
}
