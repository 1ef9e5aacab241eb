//! Integration tests for the complete lexigraph pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Ingest → Cache → Store
//! - Service → Search / Resolution / Indexing
//! - Outcome envelopes at the transport boundary
//!
//! Run with: cargo test --test integration_tests

use lexigraph_api::{Outcome, SearchOutcome, ServiceConfig, VocabService};
use lexigraph_store::EntityKind;
use std::path::PathBuf;
use tempfile::tempdir;

const FIXTURE_TTL: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .

<https://vocab.example/general/observation> a skos:ConceptScheme ;
    skos:prefLabel "Observation"@en ;
    skos:narrower <https://vocab.example/inst/instrument> .

<https://vocab.example/inst/instrument> a skos:ConceptScheme ;
    skos:prefLabel "Instrument"@en ;
    skos:definition "Kinds of observing instrument."@en .

<https://vocab.example/inst/radar-1> a skos:Concept ;
    skos:prefLabel "Radar 1"@en ;
    skos:altLabel "SAR-1"@en ;
    skos:inScheme <https://vocab.example/inst/instrument> .

<https://vocab.example/inst/lidar-1> a skos:Concept ;
    skos:prefLabel "Lidar 1"@en ;
    skos:inScheme <https://vocab.example/inst/instrument> .
"#;

fn service_over(dir: &tempfile::TempDir) -> (VocabService, PathBuf) {
    let source = dir.path().join("vocab.ttl");
    std::fs::write(&source, FIXTURE_TTL).unwrap();
    let config = ServiceConfig {
        vocab_source: source.clone(),
        snapshot_path: dir.path().join("cache").join("vocab.snapshot"),
        cache_hours: 1,
        debug: false,
    };
    (VocabService::new(config), source)
}

#[test]
fn search_ranks_summed_weights_end_to_end() {
    let dir = tempdir().unwrap();
    let (service, _) = service_over(&dir);

    let SearchOutcome::Ranked(hits) = service.search("1", EntityKind::Concept).unwrap() else {
        panic!("expected matches");
    };

    // "Radar 1" matches by pref label and "SAR-1" by alt label: 50 + 5.
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].uri, "https://vocab.example/inst/radar-1");
    assert_eq!(hits[0].weight, 55);
    assert_eq!(hits[1].uri, "https://vocab.example/inst/lidar-1");
    assert_eq!(hits[1].weight, 50);
}

#[test]
fn namespace_hint_reaches_uri_only_matches() {
    let dir = tempdir().unwrap();
    let (service, _) = service_over(&dir);

    // No label ends with "radar-1"; only the URI clause fires.
    let SearchOutcome::Ranked(hits) =
        service.search("inst:radar-1", EntityKind::Concept).unwrap()
    else {
        panic!("expected matches");
    };
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].uri, "https://vocab.example/inst/radar-1");
    assert_eq!(hits[0].weight, 10);
}

#[test]
fn scheme_search_resolves_scheme_records() {
    let dir = tempdir().unwrap();
    let (service, _) = service_over(&dir);

    let SearchOutcome::Ranked(hits) = service
        .search("instrument", EntityKind::ConceptScheme)
        .unwrap()
    else {
        panic!("expected matches");
    };
    assert_eq!(hits[0].uri, "https://vocab.example/inst/instrument");
}

#[test]
fn concept_resolution_includes_the_scheme_hierarchy() {
    let dir = tempdir().unwrap();
    let (service, _) = service_over(&dir);

    let record = service
        .concept("https://vocab.example/inst/radar-1")
        .unwrap()
        .expect("known concept");

    assert_eq!(record.info.pref_label.as_deref(), Some("Radar 1"));
    assert_eq!(record.in_scheme.info.uri, "https://vocab.example/inst/instrument");
    assert_eq!(record.in_scheme.narrower_than.len(), 1);
    assert_eq!(
        record.in_scheme.narrower_than[0].pref_label.as_deref(),
        Some("Observation")
    );
}

#[test]
fn unknown_uri_resolves_to_none() {
    let dir = tempdir().unwrap();
    let (service, _) = service_over(&dir);

    assert!(service.concept("https://vocab.example/nope").unwrap().is_none());
    assert!(service.scheme("https://vocab.example/nope").unwrap().is_none());
}

#[test]
fn scheme_with_members_lists_every_in_scheme_concept() {
    let dir = tempdir().unwrap();
    let (service, _) = service_over(&dir);

    let record = service
        .scheme_concepts("https://vocab.example/inst/instrument")
        .unwrap()
        .expect("known scheme");

    let mut members: Vec<&str> = record
        .concepts
        .as_deref()
        .unwrap()
        .iter()
        .map(|c| c.uri.as_str())
        .collect();
    members.sort();
    assert_eq!(
        members,
        vec![
            "https://vocab.example/inst/lidar-1",
            "https://vocab.example/inst/radar-1",
        ]
    );
}

#[test]
fn strict_indexing_end_to_end() {
    let dir = tempdir().unwrap();
    let (service, _) = service_over(&dir);

    let result = service
        .index_strict(
            "https://vocab.example/inst",
            &["instrument".to_string()],
            &[
                ("instrument".to_string(), "radar-1".to_string()),
                ("contact".to_string(), "ops@example.org".to_string()),
            ],
        )
        .unwrap();

    assert_eq!(
        result
            .bucket("https://vocab.example/inst")
            .and_then(|b| b.get("instrument"))
            .map(String::as_str),
        Some("radar-1")
    );
    assert_eq!(
        result
            .bucket("general")
            .and_then(|b| b.get("Observation"))
            .map(String::as_str),
        Some("radar-1")
    );
    assert_eq!(
        result
            .bucket("unspecified_vocab")
            .and_then(|b| b.get("contact"))
            .map(String::as_str),
        Some("ops@example.org")
    );
}

#[test]
fn lenient_indexing_end_to_end() {
    let dir = tempdir().unwrap();
    let (service, _) = service_over(&dir);

    let result = service
        .index_lenient(
            "https://vocab.example/inst",
            &["instrument".to_string()],
            &[("instrument".to_string(), "whatever".to_string())],
        )
        .unwrap();

    assert_eq!(
        result
            .bucket("https://vocab.example/inst")
            .and_then(|b| b.get("instrument"))
            .map(String::as_str),
        Some("whatever")
    );
}

#[test]
fn queries_reuse_the_snapshot_until_invalidated() {
    let dir = tempdir().unwrap();
    let (service, source) = service_over(&dir);

    // Warm the cache, then grow the source file.
    assert!(service
        .concept("https://vocab.example/inst/radar-1")
        .unwrap()
        .is_some());
    let extended = format!(
        "{FIXTURE_TTL}\n<https://vocab.example/inst/sonar-1> a skos:Concept ;\n    skos:prefLabel \"Sonar 1\"@en ;\n    skos:inScheme <https://vocab.example/inst/instrument> .\n"
    );
    std::fs::write(&source, extended).unwrap();

    // Inside the staleness window the snapshot still answers.
    assert!(service
        .concept("https://vocab.example/inst/sonar-1")
        .unwrap()
        .is_none());

    // After invalidation the next load rebuilds from the new source.
    service.cache().invalidate().unwrap();
    assert!(service
        .concept("https://vocab.example/inst/sonar-1")
        .unwrap()
        .is_some());
}

#[test]
fn outcome_envelopes_match_the_transport_contract() {
    let success = Outcome::success(vec!["x"]);
    let value = serde_json::to_value(&success).unwrap();
    assert_eq!(value, serde_json::json!({ "error": false, "result": ["x"] }));

    let empty: Outcome<Vec<&str>> = Outcome::empty();
    let value = serde_json::to_value(&empty).unwrap();
    assert_eq!(value, serde_json::json!({ "error": false, "result": null }));

    let failure: Outcome<Vec<&str>> = Outcome::failure("radar-9 not in https://vocab.example/inst");
    let value = serde_json::to_value(&failure).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "error": true,
            "error_reason": "radar-9 not in https://vocab.example/inst"
        })
    );
    assert!(failure.is_error());
}
