//! Ranked selection: a disjunction of weighted match clauses over one entity
//! kind, grouped by URI with summed weights.
//!
//! Clauses are typed and compiled with `regex::escape`, so caller-supplied
//! text can never change the shape of a query. Matching is case-insensitive;
//! label clauses anchor at the end of the label, URI clauses match anywhere
//! in the URI text.

use crate::{skos, StoreError, Term, TripleStore};
use regex::Regex;
use std::collections::BTreeMap;

/// The two entity kinds a vocabulary declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Concept,
    ConceptScheme,
}

impl EntityKind {
    pub fn class_iri(self) -> &'static str {
        match self {
            EntityKind::Concept => skos::SKOS_CONCEPT,
            EntityKind::ConceptScheme => skos::SKOS_CONCEPT_SCHEME,
        }
    }
}

/// One disjunct of a ranked selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldClause {
    /// Preferred label ends with the needle (case-insensitive).
    PrefLabelSuffix(String),
    /// Alternate label ends with the needle (case-insensitive).
    AltLabelSuffix(String),
    /// URI text contains the needle (case-insensitive).
    UriContains(String),
}

impl FieldClause {
    fn pattern(&self) -> String {
        match self {
            FieldClause::PrefLabelSuffix(needle) | FieldClause::AltLabelSuffix(needle) => {
                format!("(?i){}$", regex::escape(needle))
            }
            FieldClause::UriContains(needle) => format!("(?i){}", regex::escape(needle)),
        }
    }

    fn label_predicate(&self) -> Option<&'static str> {
        match self {
            FieldClause::PrefLabelSuffix(_) => Some(skos::SKOS_PREF_LABEL),
            FieldClause::AltLabelSuffix(_) => Some(skos::SKOS_ALT_LABEL),
            FieldClause::UriContains(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedClause {
    pub field: FieldClause,
    pub weight: u32,
}

/// A weighted disjunctive selection over entities of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSelect {
    pub kind: EntityKind,
    pub clauses: Vec<WeightedClause>,
}

/// One result row: a URI and its summed weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub uri: String,
    pub weight: u32,
}

struct CompiledClause {
    regex: Regex,
    label_predicate: Option<&'static str>,
    weight: u32,
}

impl RankedSelect {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            clauses: Vec::new(),
        }
    }

    pub fn clause(mut self, field: FieldClause, weight: u32) -> Self {
        self.clauses.push(WeightedClause { field, weight });
        self
    }

    /// Run the selection: every matching clause instance contributes its
    /// weight to the entity's total, and entities come back in descending
    /// total order. Equal totals have no specified relative order.
    pub fn execute(&self, store: &TripleStore) -> Result<Vec<Binding>, StoreError> {
        let compiled: Vec<CompiledClause> = self
            .clauses
            .iter()
            .map(|clause| {
                Ok(CompiledClause {
                    regex: Regex::new(&clause.field.pattern())?,
                    label_predicate: clause.field.label_predicate(),
                    weight: clause.weight,
                })
            })
            .collect::<Result<_, StoreError>>()?;

        let mut totals: BTreeMap<&str, u32> = BTreeMap::new();
        for uri in store.typed_subjects(self.kind.class_iri()) {
            let mut total = 0u32;
            for clause in &compiled {
                match clause.label_predicate {
                    Some(predicate) => {
                        for triple in store.matching(Some(uri), Some(predicate), None) {
                            if let Term::Literal { lexical, .. } = &triple.object {
                                if clause.regex.is_match(lexical) {
                                    total += clause.weight;
                                }
                            }
                        }
                    }
                    None => {
                        if clause.regex.is_match(uri) {
                            total += clause.weight;
                        }
                    }
                }
            }
            if total > 0 {
                totals.insert(uri, total);
            }
        }

        let mut bindings: Vec<Binding> = totals
            .into_iter()
            .map(|(uri, weight)| Binding {
                uri: uri.to_string(),
                weight,
            })
            .collect();
        bindings.sort_by(|a, b| b.weight.cmp(&a.weight));
        Ok(bindings)
    }
}
