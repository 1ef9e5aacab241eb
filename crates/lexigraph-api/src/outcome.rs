//! JSON envelope used at the transport boundary.
//!
//! Serializes as `{"error": false, "result": ...}` on success (with `result`
//! null for a NotFound/NoMatch), or `{"error": true, "error_reason": "..."}`
//! on failure.

use crate::error::VocabError;
use serde::Serialize;

#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Success { error: bool, result: Option<T> },
    Failure { error: bool, error_reason: String },
}

impl<T> Outcome<T> {
    pub fn success(result: T) -> Self {
        Outcome::Success {
            error: false,
            result: Some(result),
        }
    }

    /// Successful, but nothing matched or resolved.
    pub fn empty() -> Self {
        Outcome::Success {
            error: false,
            result: None,
        }
    }

    pub fn failure(reason: impl ToString) -> Self {
        Outcome::Failure {
            error: true,
            error_reason: reason.to_string(),
        }
    }

    pub fn from_result(result: Result<Option<T>, VocabError>) -> Self {
        match result {
            Ok(Some(value)) => Outcome::success(value),
            Ok(None) => Outcome::empty(),
            Err(err) => Outcome::failure(err),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }
}
