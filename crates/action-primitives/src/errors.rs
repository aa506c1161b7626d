//! Error types for action primitives

use thiserror::Error;

/// Failure modes of a single page operation
#[derive(Debug, Error, Clone)]
pub enum ActionError {
    /// The page transport failed (browser gone, evaluation threw, ...)
    #[error("CDP I/O error: {0}")]
    CdpIo(String),

    /// The page answered with something the primitive cannot interpret
    #[error("Unexpected page response: {0}")]
    UnexpectedResponse(String),

    /// Script construction failed before anything was sent
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActionError {
    /// Check if this error is transient.
    ///
    /// Callers only use this for classification; the engine never retries
    /// an actuation within the same content identity.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ActionError::CdpIo(_))
    }
}
