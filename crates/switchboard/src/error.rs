//! Error types for the Switchboard framework layer.

use thiserror::Error;

/// Errors that can occur during context extraction.
///
/// An extraction failure is not fatal: the handler whose parameter failed
/// to extract is skipped.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// The interaction does not carry the expected payload.
    #[error("payload mismatch: expected {expected}")]
    PayloadMismatch {
        /// The payload the extractor needed.
        expected: &'static str,
    },

    /// The session could not be downcast to the requested concrete type.
    #[error("session type mismatch: expected '{expected}'")]
    SessionTypeMismatch {
        /// Expected session type name.
        expected: &'static str,
    },

    /// Custom extraction error.
    #[error("{0}")]
    Custom(String),
}

impl ExtractError {
    /// Creates a custom extraction error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;
