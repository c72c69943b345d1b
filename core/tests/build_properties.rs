use epistula_core::builder::{build, BuildConfig};
use epistula_core::persist::{save_artifacts, ArtifactSet, IndexPaths, MetaFile};
use epistula_core::{split, Document};
use std::collections::HashSet;
use std::fs;

fn corpus() -> Vec<Document> {
    let long: String = (0..120).map(|i| format!("notion{i} virtue ")).collect();
    vec![
        Document { number: 1, title: "On Saving Time".into(), content: "Continue to act thus, my dear Lucilius, set yourself free; time is precious.".into() },
        Document { number: 2, title: "On Discursiveness in Reading[1]".into(), content: "Reading many authors and books of every sort may tend to make you discursive.".into() },
        Document { number: 3, title: "On True and False Friendship".into(), content: long },
        Document { number: 4, title: "On the Terrors of Death".into(), content: "Keep on as you have begun; death is not an evil, death comes to all.".into() },
    ]
}

#[test]
fn build_is_idempotent_to_the_byte() {
    let config = BuildConfig::default();
    let (full_a, light_a) = split(build(&corpus(), &config).unwrap());
    let (full_b, light_b) = split(build(&corpus(), &config).unwrap());
    assert_eq!(serde_json::to_vec(&full_a).unwrap(), serde_json::to_vec(&full_b).unwrap());
    assert_eq!(serde_json::to_vec(&light_a).unwrap(), serde_json::to_vec(&light_b).unwrap());
}

#[test]
fn persisted_artifacts_are_identical_across_builds() {
    let dir = tempfile::tempdir().unwrap();
    let mut outputs = Vec::new();
    for run in ["a", "b"] {
        let paths = IndexPaths::new(dir.path().join(run));
        let (full, light) = split(build(&corpus(), &BuildConfig::default()).unwrap());
        let meta = MetaFile::for_build(&full);
        save_artifacts(&paths, &ArtifactSet { full: &full, light: &light, library: None, meta: &meta }).unwrap();
        outputs.push((fs::read(paths.full()).unwrap(), fs::read(paths.light()).unwrap()));
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn keyword_cap_dedup_and_coverage_hold() {
    let config = BuildConfig { stored_keyword_limit: 50, ..BuildConfig::default() };
    let full = build(&corpus(), &config).unwrap();
    let numbers: HashSet<u32> = full.documents.iter().map(|r| r.number).collect();
    assert_eq!(numbers.len(), full.documents.len());

    for record in &full.documents {
        assert!(record.keywords.len() <= 50);
        for keyword in &record.keywords {
            assert!(full.index.get(keyword).unwrap().contains(&record.number), "{keyword} misses {}", record.number);
        }
    }
    for (term, postings) in full.index.iter() {
        assert!(!postings.is_empty(), "{term} has no documents");
        let unique: HashSet<&u32> = postings.iter().collect();
        assert_eq!(unique.len(), postings.len(), "{term} has duplicates");
        assert!(postings.iter().all(|n| numbers.contains(n)));
    }
}

#[test]
fn shared_terms_list_documents_in_corpus_order() {
    let full = build(&corpus(), &BuildConfig::default()).unwrap();
    assert_eq!(full.index.get("time"), Some(&[1][..]));
    assert_eq!(full.index.get("death"), Some(&[4][..]));
    assert_eq!(full.index.get("true"), Some(&[3][..]));
    assert_eq!(full.documents[1].title, "On Discursiveness in Reading");
    assert_eq!(full.documents[2].keywords[0], "virtue");
}
