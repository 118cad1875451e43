//! Model persistence tests.
//!
//! These verify that the bundled models survive an export + reload cycle
//! through both the JSON directory format and the binary snapshot, and that
//! damaged model sets are rejected as a whole.

use std::sync::Arc;

use glossa::model::NgramModel;
use glossa::{DetectorBuilder, Language, ModelError, ModelStore};

fn exported_dir() -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().unwrap();
    ModelStore::global().unwrap().export_to_dir(dir.path()).unwrap();
    dir
}

#[test]
fn export_then_load_from_dir() {
    let dir = exported_dir();
    for language in Language::all() {
        assert!(dir.path().join(format!("{}.json", language.iso_code_639_1())).is_file());
    }

    let bundled = ModelStore::global().unwrap();
    let reloaded = ModelStore::load_from_dir(dir.path()).unwrap();
    assert_eq!(reloaded.ngram_count(), bundled.ngram_count());
    for language in Language::all() {
        assert_eq!(
            reloaded.model_for(language).to_file(),
            bundled.model_for(language).to_file()
        );
    }
}

#[test]
fn reloaded_store_detects_like_bundled() {
    let dir = exported_dir();
    let store = Arc::new(ModelStore::load(dir.path()).unwrap());
    let detector = DetectorBuilder::from_all_languages()
        .with_store(store)
        .build()
        .unwrap();
    assert_eq!(
        detector.detect_language_of("Ik zou vanavond graag iets lekkers willen eten"),
        Some(Language::Dutch)
    );
}

#[test]
fn missing_model_file_fails_the_store() {
    let dir = exported_dir();
    std::fs::remove_file(dir.path().join("fr.json")).unwrap();

    let err = ModelStore::load_from_dir(dir.path()).unwrap_err();
    match err {
        ModelError::Missing { language } => assert_eq!(language, "fr"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn corrupt_model_file_fails_the_store() {
    let dir = exported_dir();
    std::fs::write(dir.path().join("de.json"), "{ not json").unwrap();

    let err = ModelStore::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ModelError::Corrupt { ref language, .. } if language == "de"));
}

#[test]
fn mislabelled_model_file_fails_the_store() {
    let dir = exported_dir();
    let english = std::fs::read_to_string(dir.path().join("en.json")).unwrap();
    std::fs::write(dir.path().join("it.json"), english).unwrap();

    let err = ModelStore::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ModelError::Corrupt { .. }));
}

#[test]
fn snapshot_file_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("snapshots").join("models.bin");

    let bundled = ModelStore::global().unwrap();
    bundled.write_snapshot(&path).unwrap();

    let restored = ModelStore::load(&path).unwrap();
    for language in Language::all() {
        assert_eq!(
            restored.model_for(language).to_file(),
            bundled.model_for(language).to_file()
        );
    }
}

#[test]
fn missing_snapshot_is_an_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = ModelStore::load(&dir.path().join("absent.bin")).unwrap_err();
    assert!(matches!(err, ModelError::Io { .. }));
}

#[test]
fn model_probabilities() {
    let store = ModelStore::global().unwrap();
    let german: &NgramModel = store.model_for(Language::German);

    assert!(german.contains("e"));
    let p = german.probability("e");
    assert!(p > 0.0 && p < 1.0);
    let lp = german.log_probability("e").unwrap();
    assert!((lp - p.ln()).abs() < 1e-12);

    // Unseen n-grams score the order's smoothing value.
    assert_eq!(german.log_probability("qqqqq"), Some(german.table(5).smoothing()));
    assert_eq!(german.probability("qqqqq"), 0.0);
    assert!(!german.contains("qqqqq"));
    assert_eq!(german.log_probability(""), None);
    assert!(german.total(1) > 0);
    assert!(!german.is_empty());
}
