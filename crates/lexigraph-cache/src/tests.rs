//! Cache lifecycle tests.

use super::*;
use std::time::Duration;
use tempfile::tempdir;

const VOCAB_V1: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
<https://v/e/one> a skos:Concept ; skos:prefLabel "One"@en .
"#;

const VOCAB_V2: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
<https://v/e/one> a skos:Concept ; skos:prefLabel "One"@en .
<https://v/e/two> a skos:Concept ; skos:prefLabel "Two"@en .
"#;

fn manager_for(dir: &tempfile::TempDir, max_age_hours: u64) -> CacheManager {
    let source = dir.path().join("vocab.ttl");
    std::fs::write(&source, VOCAB_V1).unwrap();
    CacheManager::new(CacheConfig {
        source,
        snapshot_path: dir.path().join("cache").join("vocab.snapshot"),
        max_age_hours,
        force_rebuild: false,
    })
}

#[test]
fn first_load_builds_and_persists() {
    let dir = tempdir().unwrap();
    let manager = manager_for(&dir, 1);

    let store = manager.load(false).unwrap();
    assert_eq!(store.len(), 2);
    assert!(manager.config().snapshot_path.exists());
}

#[test]
fn fresh_snapshot_is_reused_even_when_the_source_changes() {
    let dir = tempdir().unwrap();
    let manager = manager_for(&dir, 1);

    let first = manager.load(false).unwrap();
    std::fs::write(&manager.config().source, VOCAB_V2).unwrap();
    let second = manager.load(false).unwrap();

    // Within the staleness window the snapshot wins over the source.
    assert_eq!(first, second);
}

#[test]
fn invalidate_forces_the_next_load_to_rebuild() {
    let dir = tempdir().unwrap();
    let manager = manager_for(&dir, 1);

    let first = manager.load(false).unwrap();
    std::fs::write(&manager.config().source, VOCAB_V2).unwrap();
    manager.invalidate().unwrap();
    let second = manager.load(false).unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 4);
}

#[test]
fn invalidate_is_idempotent() {
    let dir = tempdir().unwrap();
    let manager = manager_for(&dir, 1);
    manager.invalidate().unwrap();
    manager.invalidate().unwrap();
}

#[test]
fn reload_rebuilds_unconditionally() {
    let dir = tempdir().unwrap();
    let manager = manager_for(&dir, 1);

    manager.load(false).unwrap();
    std::fs::write(&manager.config().source, VOCAB_V2).unwrap();
    let reloaded = manager.load(true).unwrap();

    assert_eq!(reloaded.len(), 4);
}

#[test]
fn zero_hour_window_rebuilds_on_every_load() {
    let dir = tempdir().unwrap();
    let manager = manager_for(&dir, 0);

    manager.load(false).unwrap();
    std::fs::write(&manager.config().source, VOCAB_V2).unwrap();
    std::thread::sleep(Duration::from_millis(20));
    let second = manager.load(false).unwrap();

    assert_eq!(second.len(), 4);
}

#[test]
fn force_rebuild_flag_bypasses_the_snapshot() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("vocab.ttl");
    std::fs::write(&source, VOCAB_V1).unwrap();
    let manager = CacheManager::new(CacheConfig {
        source,
        snapshot_path: dir.path().join("vocab.snapshot"),
        max_age_hours: 1,
        force_rebuild: true,
    });

    manager.load(false).unwrap();
    std::fs::write(&manager.config().source, VOCAB_V2).unwrap();
    let second = manager.load(false).unwrap();

    assert_eq!(second.len(), 4);
}

#[test]
fn corrupt_snapshot_is_treated_as_a_miss() {
    let dir = tempdir().unwrap();
    let manager = manager_for(&dir, 1);

    manager.load(false).unwrap();
    std::fs::write(&manager.config().snapshot_path, b"not a snapshot").unwrap();

    let store = manager.load(false).unwrap();
    assert_eq!(store.len(), 2);
    // The rebuild re-persisted a readable snapshot.
    assert!(manager.restore().is_ok());
}

#[test]
fn restore_reports_corruption() {
    let dir = tempdir().unwrap();
    let manager = manager_for(&dir, 1);

    std::fs::create_dir_all(manager.config().snapshot_path.parent().unwrap()).unwrap();
    std::fs::write(&manager.config().snapshot_path, b"garbage").unwrap();

    assert!(matches!(
        manager.restore(),
        Err(CacheError::CorruptSnapshot { .. })
    ));
}

#[test]
fn persist_restore_round_trips() {
    let dir = tempdir().unwrap();
    let manager = manager_for(&dir, 1);

    let built = manager.build().unwrap();
    manager.persist(&built).unwrap();
    let restored = manager.restore().unwrap();

    assert_eq!(built, restored);
}

#[test]
fn missing_source_builds_an_empty_store() {
    let dir = tempdir().unwrap();
    let manager = CacheManager::new(CacheConfig {
        source: dir.path().join("absent.ttl"),
        snapshot_path: dir.path().join("vocab.snapshot"),
        max_age_hours: 1,
        force_rebuild: false,
    });

    let store = manager.load(false).unwrap();
    assert!(store.is_empty());
}

#[test]
fn expiry_boundary_is_not_yet_stale() {
    assert!(!is_expired(Duration::from_secs(3599), 1));
    assert!(!is_expired(Duration::from_secs(3600), 1));
    assert!(is_expired(Duration::from_secs(3601), 1));
    assert!(is_expired(Duration::from_nanos(1), 0));
}
