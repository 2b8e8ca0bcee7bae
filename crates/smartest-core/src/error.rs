//! Evaluation error types.
//!
//! The scoring path is total over well-formed text, so the only error the
//! engine surfaces is a reference answer it cannot grade against. Missing
//! extractions are represented as `None`/empty values, never as errors.

use thiserror::Error;

/// Errors returned by [`crate::scorer::Scorer::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The reference answer is missing or carries no text.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl EvalError {
    /// Returns `true` if retrying the same call can never succeed.
    ///
    /// The engine performs no I/O, so every error is permanent.
    pub fn is_permanent(&self) -> bool {
        matches!(self, EvalError::InvalidInput(_))
    }
}

/// Convenience alias for results produced by the evaluation engine.
pub type EvalResult<T> = std::result::Result<T, EvalError>;
