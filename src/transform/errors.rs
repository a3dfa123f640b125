use crate::edit::EditError;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("required marker {marker:?} not found")]
    MarkerNotFound {
        marker: String,
        hint: Option<MarkerHint>,
    },

    #[error("{search:?} matched 0 locations")]
    NoMatch { search: String },

    #[error("invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("document hash {found} does not match expected {expected}")]
    VerifyMismatch { expected: String, found: String },

    #[error(transparent)]
    Edit(#[from] EditError),
}

/// The line that most resembles a missing marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerHint {
    /// 1-based line number
    pub line: usize,
    pub text: String,
    pub similarity: f64,
}

impl fmt::Display for MarkerHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "closest line {}: {:?} ({:.0}% similar)",
            self.line,
            self.text,
            self.similarity * 100.0
        )
    }
}
