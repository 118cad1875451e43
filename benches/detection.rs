//! Benchmarks for detection queries.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use glossa::preprocess::normalize;
use glossa::{DetectorBuilder, LanguageDetector, ModelStore};

const SHORT: &str = "Bonjour, comment allez-vous?";
const SENTENCE: &str = "Ich habe keine Zeit, weil ich arbeiten muss";

fn long_text() -> String {
    "The weather is lovely this afternoon and I want to go outside. ".repeat(8)
}

fn bench_store_init(c: &mut Criterion) {
    c.bench_function("store_bundled_parse", |bench| {
        bench.iter(|| black_box(ModelStore::bundled().unwrap()))
    });
}

fn bench_normalize(c: &mut Criterion) {
    let text = long_text();
    c.bench_function("normalize_long", |bench| bench.iter(|| black_box(normalize(&text))));
}

fn bench_detect(c: &mut Criterion) {
    let all = LanguageDetector::for_all_languages().unwrap();
    let four = LanguageDetector::for_languages(&["en", "fr", "es", "de"]).unwrap();
    let low = DetectorBuilder::from_all_languages()
        .with_low_accuracy_mode()
        .build()
        .unwrap();
    let long = long_text();

    c.bench_function("detect_short_4_languages", |bench| {
        bench.iter(|| black_box(four.detect_language_of(SHORT)))
    });
    c.bench_function("detect_sentence_all_languages", |bench| {
        bench.iter(|| black_box(all.detect_language_of(SENTENCE)))
    });
    c.bench_function("detect_sentence_low_accuracy", |bench| {
        bench.iter(|| black_box(low.detect_language_of(SENTENCE)))
    });
    c.bench_function("confidence_values_long_all_languages", |bench| {
        bench.iter(|| black_box(all.compute_language_confidence_values(&long)))
    });
}

fn bench_batch(c: &mut Criterion) {
    let all = LanguageDetector::for_all_languages().unwrap();
    let texts: Vec<&str> = std::iter::repeat([SHORT, SENTENCE]).take(64).flatten().collect();
    c.bench_function("detect_batch_128", |bench| {
        bench.iter(|| black_box(all.detect_batch(&texts)))
    });
}

criterion_group!(benches, bench_store_init, bench_normalize, bench_detect, bench_batch);
criterion_main!(benches);
