use std::sync::Arc;

use rayscore::synthetic::{synthetic_banks, write_content_root};
use rayscore::{Catalog, ContextCache, ScoringConfig, ScoringContext, ScoringError};
use tempfile::tempdir;

#[test]
fn loaded_root_matches_in_memory_context() {
    let dir = tempdir().unwrap();
    let banks = synthetic_banks();
    write_content_root(dir.path(), &banks).unwrap();

    let loaded = ScoringContext::load_dir(dir.path()).unwrap();
    let built = ScoringContext::new(banks, Catalog::builtin(), ScoringConfig::default()).unwrap();
    assert_eq!(loaded.fingerprint(), built.fingerprint());
    assert_eq!(loaded.dimension_items().len(), 360);
    assert_eq!(loaded.signals().len(), 24);
}

#[test]
fn cache_reuses_until_files_change() {
    let dir = tempdir().unwrap();
    write_content_root(dir.path(), &synthetic_banks()).unwrap();

    let mut cache = ContextCache::new();
    let first = cache.get_or_load(dir.path()).unwrap();
    let second = cache.get_or_load(dir.path()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);

    std::fs::write(
        dir.path().join("config.json"),
        r#"{"selection": {"tie_threshold": 1.0}}"#,
    )
    .unwrap();
    let reloaded = cache.get_or_load(dir.path()).unwrap();
    assert!(!Arc::ptr_eq(&first, &reloaded));
    assert_ne!(first.fingerprint(), reloaded.fingerprint());
    assert_eq!(reloaded.config().selection.tie_threshold, 1.0);
    assert_eq!(cache.len(), 1);

    cache.invalidate(dir.path());
    assert!(cache.is_empty());
}

#[test]
fn malformed_subfacet_code_fails_the_load() {
    let dir = tempdir().unwrap();
    let mut banks = synthetic_banks();
    banks.dimension_items[0].subfacet_code = Some("R10a".to_string());
    write_content_root(dir.path(), &banks).unwrap();

    let err = ScoringContext::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ScoringError::UnknownSubfacet { .. }));
}

#[test]
fn missing_required_bank_is_an_io_error() {
    let dir = tempdir().unwrap();
    write_content_root(dir.path(), &synthetic_banks()).unwrap();
    std::fs::remove_file(dir.path().join("load_items.json")).unwrap();

    let err = ScoringContext::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ScoringError::Io { .. }));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempdir().unwrap();
    write_content_root(dir.path(), &synthetic_banks()).unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"usability": {"dimension_quorum": 5}}"#,
    )
    .unwrap();

    let err = ScoringContext::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ScoringError::Config(_)));
}
