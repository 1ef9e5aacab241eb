//! One-hop resolution of URIs into contextual records.
//!
//! All four operations are read-only and deterministic for a fixed store
//! snapshot. None of them fails on a missing entity: the result degrades to
//! a record carrying only the URI. Expansion is deliberately one hop —
//! broader/narrower/member lists contain bare info records, never a
//! transitive closure, so cyclic scheme graphs cannot cause non-termination.

use crate::record::{ConceptRecord, EntityInfo, SchemeRecord};
use lexigraph_store::{skos, TripleStore};

fn literal_of(store: &TripleStore, uri: &str, predicate: &str) -> Option<String> {
    store
        .value_of(uri, predicate)
        .map(|term| term.lexical().to_string())
}

/// Labels and definition of `uri`, omitting absent fields.
pub fn resolve_info(store: &TripleStore, uri: &str) -> EntityInfo {
    EntityInfo {
        uri: uri.to_string(),
        pref_label: literal_of(store, uri, skos::SKOS_PREF_LABEL),
        alt_label: literal_of(store, uri, skos::SKOS_ALT_LABEL),
        definition: literal_of(store, uri, skos::SKOS_DEFINITION),
    }
}

/// A scheme with its one-hop broader/narrower context.
pub fn resolve_scheme(store: &TripleStore, uri: &str) -> SchemeRecord {
    let broader_than = store
        .subjects_pointing_at(skos::SKOS_BROADER, uri)
        .into_iter()
        .map(|subject| resolve_info(store, subject))
        .collect();
    let narrower_than = store
        .subjects_pointing_at(skos::SKOS_NARROWER, uri)
        .into_iter()
        .map(|subject| resolve_info(store, subject))
        .collect();
    SchemeRecord {
        info: resolve_info(store, uri),
        broader_than,
        narrower_than,
        concepts: None,
    }
}

/// A concept with its owning scheme expanded.
///
/// Without an `inScheme` relation the owner resolves against the empty URI,
/// which yields a bare `in_scheme` record callers must guard.
pub fn resolve_concept(store: &TripleStore, uri: &str) -> ConceptRecord {
    let owner = store
        .value_of(uri, skos::SKOS_IN_SCHEME)
        .and_then(|term| term.as_iri())
        .unwrap_or("");
    ConceptRecord {
        info: resolve_info(store, uri),
        in_scheme: resolve_scheme(store, owner),
    }
}

/// [`resolve_scheme`] plus the member concepts declaring this scheme via
/// `inScheme`.
pub fn resolve_scheme_with_members(store: &TripleStore, uri: &str) -> SchemeRecord {
    let mut record = resolve_scheme(store, uri);
    record.concepts = Some(
        store
            .subjects_pointing_at(skos::SKOS_IN_SCHEME, uri)
            .into_iter()
            .map(|subject| resolve_info(store, subject))
            .collect(),
    );
    record
}
