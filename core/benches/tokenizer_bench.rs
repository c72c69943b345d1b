use criterion::{criterion_group, criterion_main, Criterion};
use epistula_core::builder::{build, BuildConfig};
use epistula_core::search::{search, Pagination, ScoringWeights};
use epistula_core::tokenizer::normalize;
use epistula_core::Document;

const PASSAGE: &str = "Continue to act thus, my dear Lucilius[1], set yourself free for your own sake; \
gather and save your time, which till lately has been forced from you, or filched away, or has merely slipped from your hands. ";

fn bench_normalize(c: &mut Criterion) {
    let text = PASSAGE.repeat(40);
    c.bench_function("normalize_letter", |b| b.iter(|| normalize(&text)));
}

fn bench_search(c: &mut Criterion) {
    let docs: Vec<Document> = (1..=124)
        .map(|n| Document { number: n, title: format!("Letter {n}"), content: PASSAGE.repeat(20) })
        .collect();
    let full = build(&docs, &BuildConfig::default()).expect("build");
    let weights = ScoringWeights::default();
    c.bench_function("search_two_words", |b| b.iter(|| search("time lucilius", &full, Pagination::default(), &weights)));
}

criterion_group!(benches, bench_normalize, bench_search);
criterion_main!(benches);
