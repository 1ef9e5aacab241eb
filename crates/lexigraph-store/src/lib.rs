//! lexigraph-store: in-memory triple store for SKOS vocabularies.
//!
//! The store holds one parsed vocabulary graph and is replaced wholesale when
//! the cache layer rebuilds it; nothing mutates a store after load. It
//! supports exactly the lookups the resolution and matching engine needs:
//!
//! - one-hop pattern matching over (subject, predicate, object)
//! - single-valued attribute lookup (`value_of`)
//! - reverse lookup of subjects pointing at a URI (`subjects_pointing_at`)
//! - enumeration of typed entities (`typed_subjects`)
//! - weighted ranked selection (`query::RankedSelect`)
//!
//! This is deliberately not a SPARQL engine. Query construction is typed
//! (`query` module) so user input is never interpolated into query text.
//!
//! Triple positions are indexed with Roaring bitmaps over triple ordinals;
//! pattern matching intersects the bitmaps of the bound positions.

pub mod query;
pub mod skos;

use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use query::{Binding, EntityKind, FieldClause, RankedSelect, WeightedClause};

// ============================================================================
// Terms and triples
// ============================================================================

/// A node in the graph: an IRI or a literal.
///
/// Blank nodes are dropped at ingest, so they never appear here. Literals
/// keep their language tag; datatypes are not needed by any lookup the
/// engine performs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Iri(String),
    Literal {
        lexical: String,
        language: Option<String>,
    },
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn literal(lexical: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            language: None,
        }
    }

    pub fn literal_with_language(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            language: Some(language.into()),
        }
    }

    /// The IRI text, if this term is an IRI.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal { .. } => None,
        }
    }

    /// The textual content: IRI text or literal lexical form.
    pub fn lexical(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::Literal { lexical, .. } => lexical,
        }
    }
}

/// One fact: subject IRI, predicate IRI, object term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

// ============================================================================
// Store
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to encode store: {0}")]
    Encode(String),
    #[error("failed to decode store: {0}")]
    Decode(String),
    #[error("invalid match pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// The materialized vocabulary graph.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripleStore {
    triples: Vec<Triple>,
    by_subject: HashMap<String, RoaringBitmap>,
    by_predicate: HashMap<String, RoaringBitmap>,
    by_object: HashMap<Term, RoaringBitmap>,
}

impl TripleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Insert a triple. Duplicate facts are ignored (set semantics).
    pub fn insert(&mut self, subject: impl Into<String>, predicate: impl Into<String>, object: Term) {
        let triple = Triple {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        };
        if self.contains(&triple.subject, &triple.predicate, &triple.object) {
            return;
        }
        let ordinal = self.triples.len() as u32;
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .insert(ordinal);
        self.by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .insert(ordinal);
        self.by_object
            .entry(triple.object.clone())
            .or_default()
            .insert(ordinal);
        self.triples.push(triple);
    }

    pub fn contains(&self, subject: &str, predicate: &str, object: &Term) -> bool {
        !self
            .matching(Some(subject), Some(predicate), Some(object))
            .is_empty()
    }

    /// One-hop pattern match; `None` in a position is a wildcard. Results
    /// come back in insertion order.
    pub fn matching<'s>(
        &'s self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Vec<&'s Triple> {
        self.candidates(subject, predicate, object)
            .into_iter()
            .map(|ordinal| &self.triples[ordinal as usize])
            .collect()
    }

    fn candidates(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> RoaringBitmap {
        let mut bound: Vec<&RoaringBitmap> = Vec::new();
        if let Some(subject) = subject {
            match self.by_subject.get(subject) {
                Some(bitmap) => bound.push(bitmap),
                None => return RoaringBitmap::new(),
            }
        }
        if let Some(predicate) = predicate {
            match self.by_predicate.get(predicate) {
                Some(bitmap) => bound.push(bitmap),
                None => return RoaringBitmap::new(),
            }
        }
        if let Some(object) = object {
            match self.by_object.get(object) {
                Some(bitmap) => bound.push(bitmap),
                None => return RoaringBitmap::new(),
            }
        }
        match bound.split_first() {
            None => (0..self.triples.len() as u32).collect(),
            Some((first, rest)) => {
                let mut result = (*first).clone();
                for bitmap in rest {
                    result &= *bitmap;
                }
                result
            }
        }
    }

    /// First value of a single-valued attribute, in insertion order.
    ///
    /// Deterministic for a fixed snapshot: insertion order is the parse
    /// order of the source.
    pub fn value_of(&self, subject: &str, predicate: &str) -> Option<&Term> {
        self.matching(Some(subject), Some(predicate), None)
            .first()
            .map(|triple| &triple.object)
    }

    /// Subjects `s` such that `(s, predicate, <target>)` holds, in insertion
    /// order, deduplicated.
    pub fn subjects_pointing_at(&self, predicate: &str, target: &str) -> Vec<&str> {
        let object = Term::iri(target);
        let mut seen: Vec<&str> = Vec::new();
        for triple in self.matching(None, Some(predicate), Some(&object)) {
            if !seen.contains(&triple.subject.as_str()) {
                seen.push(&triple.subject);
            }
        }
        seen
    }

    /// Subjects declared as instances of `class_iri` via `rdf:type`.
    pub fn typed_subjects(&self, class_iri: &str) -> Vec<&str> {
        self.subjects_pointing_at(skos::RDF_TYPE, class_iri)
    }

    /// Whether a URI occurs anywhere in the graph, as subject or object.
    pub fn mentions(&self, uri: &str) -> bool {
        self.by_subject.contains_key(uri) || self.by_object.contains_key(&Term::iri(uri))
    }

    // ========================================================================
    // Snapshot encoding
    // ========================================================================

    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        bincode::serialize(self).map_err(|e| StoreError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        bincode::deserialize(bytes).map_err(|e| StoreError::Decode(e.to_string()))
    }
}
