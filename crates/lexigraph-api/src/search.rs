//! Weighted vocabulary search.
//!
//! The input may carry a namespace hint (`"ns:term"`); without a colon no
//! namespace clause is considered. Three clauses feed the ranking:
//!
//! 1. preferred label ends with the bare term — weight 50
//! 2. URI contains `/{namespace}/{term}` (hint only) — weight 10
//! 3. alternate label ends with the bare term — weight 5
//!
//! Weights sum per URI and results come back in descending total order.

use crate::error::VocabError;
use crate::record::VocabRecord;
use crate::resolver;
use lexigraph_store::{EntityKind, FieldClause, RankedSelect, TripleStore};
use serde::Serialize;

pub const PREF_LABEL_WEIGHT: u32 = 50;
pub const NAMESPACE_WEIGHT: u32 = 10;
pub const ALT_LABEL_WEIGHT: u32 = 5;

/// One ranked match, already expanded into its record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub uri: String,
    pub weight: u32,
    pub record: VocabRecord,
}

/// An empty match set is an outcome of its own, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Ranked(Vec<SearchHit>),
    NoMatch,
}

/// Split `"ns:term"` on the first colon. No colon means no namespace hint.
pub fn split_namespace_hint(input: &str) -> (Option<&str>, &str) {
    match input.split_once(':') {
        Some((namespace, term)) => (Some(namespace), term),
        None => (None, input),
    }
}

pub fn search(
    store: &TripleStore,
    input: &str,
    kind: EntityKind,
) -> Result<SearchOutcome, VocabError> {
    let (namespace, term) = split_namespace_hint(input);

    let mut select = RankedSelect::new(kind).clause(
        FieldClause::PrefLabelSuffix(term.to_string()),
        PREF_LABEL_WEIGHT,
    );
    if let Some(namespace) = namespace {
        select = select.clause(
            FieldClause::UriContains(format!("/{namespace}/{term}")),
            NAMESPACE_WEIGHT,
        );
    }
    select = select.clause(
        FieldClause::AltLabelSuffix(term.to_string()),
        ALT_LABEL_WEIGHT,
    );

    let bindings = select
        .execute(store)
        .map_err(|e| VocabError::QueryFailure {
            reason: e.to_string(),
        })?;

    if bindings.is_empty() {
        tracing::debug!(input, "search matched nothing");
        return Ok(SearchOutcome::NoMatch);
    }

    let hits = bindings
        .into_iter()
        .map(|binding| {
            let record = match kind {
                EntityKind::Concept => {
                    VocabRecord::Concept(resolver::resolve_concept(store, &binding.uri))
                }
                EntityKind::ConceptScheme => {
                    VocabRecord::Scheme(resolver::resolve_scheme(store, &binding.uri))
                }
            };
            SearchHit {
                uri: binding.uri,
                weight: binding.weight,
                record,
            }
        })
        .collect();

    Ok(SearchOutcome::Ranked(hits))
}
