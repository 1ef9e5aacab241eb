//! Externally visible vocabulary records.
//!
//! Absent fields are omitted from serialized output, so a record only ever
//! carries the keys its entity actually has.

use serde::{Deserialize, Serialize};

/// Labels and definition of one entity. Always carries the URI; everything
/// else is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInfo {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl EntityInfo {
    /// A record carrying nothing but the URI.
    pub fn bare(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }
}

/// A concept scheme with its one-hop hierarchy context.
///
/// `broader_than` lists the schemes declaring this one as their broader
/// target, `narrower_than` those declaring it as their narrower target.
/// Entries are bare [`EntityInfo`] records, never expanded further.
/// `concepts` is populated only by the with-members resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeRecord {
    #[serde(flatten)]
    pub info: EntityInfo,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub broader_than: Vec<EntityInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub narrower_than: Vec<EntityInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concepts: Option<Vec<EntityInfo>>,
}

/// A concept together with its owning scheme.
///
/// A concept without an `inScheme` relation gets an `in_scheme` whose URI is
/// the empty string; callers must guard that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRecord {
    #[serde(flatten)]
    pub info: EntityInfo,
    pub in_scheme: SchemeRecord,
}

/// A resolved entity of either kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VocabRecord {
    Concept(ConceptRecord),
    Scheme(SchemeRecord),
}

impl VocabRecord {
    pub fn uri(&self) -> &str {
        match self {
            VocabRecord::Concept(c) => &c.info.uri,
            VocabRecord::Scheme(s) => &s.info.uri,
        }
    }
}
