//! Classification of metadata properties against the vocabulary.
//!
//! Two entry points share the iteration but differ in what they validate:
//!
//! - [`index_strict`] matches each recognized property's **value** against a
//!   concept URI (`{namespace}/{value}`) and additionally checks that the
//!   concept's owning scheme corresponds to the property's term.
//! - [`index_lenient`] matches each recognized property's **term** against a
//!   concept scheme URI (`{namespace}/{term}`) and never inspects the value.
//!
//! The asymmetry is intentional; these are two distinct validation policies.
//! Both fail fast on the first mismatch. Terms outside the recognized list
//! always land in the `unspecified_vocab` bucket.

use crate::error::VocabError;
use crate::record::SchemeRecord;
use crate::resolver;
use lexigraph_store::{skos, Term, TripleStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const GENERAL_BUCKET: &str = "general";
pub const UNSPECIFIED_BUCKET: &str = "unspecified_vocab";

/// Buckets of classified properties, keyed by namespace or one of the two
/// literal bucket names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyProperties {
    #[serde(flatten)]
    buckets: BTreeMap<String, BTreeMap<String, String>>,
}

impl VocabularyProperties {
    fn record(&mut self, bucket: &str, term: &str, value: &str) {
        self.buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(term.to_string(), value.to_string());
    }

    pub fn bucket(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.buckets.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

fn is_typed_as(store: &TripleStore, uri: &str, class_iri: &str) -> bool {
    store.contains(uri, skos::RDF_TYPE, &Term::iri(class_iri))
}

/// Promote a property into the `general` bucket, keyed by the preferred
/// label of the first scheme this one is narrower than. Without a preferred
/// label there is nothing trustworthy to key on, so the promotion is skipped.
fn promote_general(out: &mut VocabularyProperties, scheme: &SchemeRecord, value: &str) {
    let Some(general) = scheme.narrower_than.first() else {
        return;
    };
    match &general.pref_label {
        Some(label) => out.record(GENERAL_BUCKET, label, value),
        None => tracing::debug!(
            uri = %general.uri,
            "general scheme has no preferred label, skipping promotion"
        ),
    }
}

pub fn index_strict(
    store: &TripleStore,
    namespace: &str,
    recognized_terms: &[String],
    properties: &[(String, String)],
) -> Result<VocabularyProperties, VocabError> {
    let mut out = VocabularyProperties::default();
    let prefix = format!("{namespace}/");

    for (term, value) in properties {
        if !recognized_terms.iter().any(|t| t == term) {
            out.record(UNSPECIFIED_BUCKET, term, value);
            continue;
        }

        let concept_uri = format!("{namespace}/{value}");
        if !is_typed_as(store, &concept_uri, skos::SKOS_CONCEPT) {
            return Err(VocabError::UnmatchedValue {
                value: value.clone(),
                namespace: namespace.to_string(),
            });
        }

        let concept = resolver::resolve_concept(store, &concept_uri);
        let scheme = &concept.in_scheme;
        let scheme_term = scheme
            .info
            .uri
            .strip_prefix(&prefix)
            .unwrap_or(&scheme.info.uri);
        if scheme_term != term {
            return Err(VocabError::TermMismatch {
                value: value.clone(),
                term: term.clone(),
            });
        }

        out.record(namespace, term, value);
        promote_general(&mut out, scheme, value);
    }

    Ok(out)
}

pub fn index_lenient(
    store: &TripleStore,
    namespace: &str,
    recognized_terms: &[String],
    properties: &[(String, String)],
) -> Result<VocabularyProperties, VocabError> {
    let mut out = VocabularyProperties::default();

    for (term, value) in properties {
        if !recognized_terms.iter().any(|t| t == term) {
            out.record(UNSPECIFIED_BUCKET, term, value);
            continue;
        }

        let scheme_uri = format!("{namespace}/{term}");
        if !is_typed_as(store, &scheme_uri, skos::SKOS_CONCEPT_SCHEME) {
            return Err(VocabError::UnmatchedTerm {
                term: term.clone(),
                namespace: namespace.to_string(),
            });
        }

        let scheme = resolver::resolve_scheme(store, &scheme_uri);
        out.record(namespace, term, value);
        promote_general(&mut out, &scheme, value);
    }

    Ok(out)
}
