//! Failure taxonomy of the engine.
//!
//! Every component operation returns a tagged outcome; nothing panics across
//! a component boundary. Unanticipated faults during query execution are
//! converted into [`VocabError::QueryFailure`] with the captured reason.

#[derive(Debug, thiserror::Error)]
pub enum VocabError {
    /// Query execution failed; carries a human-readable reason.
    #[error("query failed: {reason}")]
    QueryFailure { reason: String },

    /// Strict indexing: no concept under the namespace carries this value.
    #[error("{value} not in {namespace}")]
    UnmatchedValue { value: String, namespace: String },

    /// Strict indexing: the matched concept belongs to a different scheme
    /// than the supplied term.
    #[error("{value} not in {term}")]
    TermMismatch { value: String, term: String },

    /// Lenient indexing: no concept scheme under the namespace carries this
    /// term.
    #[error("{term} not in {namespace}")]
    UnmatchedTerm { term: String, namespace: String },

    #[error(transparent)]
    Cache(#[from] lexigraph_cache::CacheError),
}
