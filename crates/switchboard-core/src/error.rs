//! Error types for the Switchboard core.
//!
//! Routing-layer errors are split the same way the crate boundary is:
//! [`ApiError`] covers anything forwarded from the client seam, and
//! [`RegistryError`] covers command-lifecycle bookkeeping on top of it.

use thiserror::Error;

/// Errors forwarded from the client library behind the [`Session`] seam.
///
/// [`Session`]: crate::session::Session
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The session is not connected to the gateway.
    #[error("session is not connected")]
    NotConnected,

    /// The API call timed out.
    #[error("API call timed out")]
    Timeout,

    /// The platform rejected the call.
    #[error("platform error ({code}): {message}")]
    Platform {
        /// Platform error code.
        code: i32,
        /// Platform error message.
        message: String,
    },

    /// A payload failed to serialize or deserialize.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Other client-side failure.
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// Creates an [`ApiError::Other`] from any message.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for session API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors from the command registration lifecycle.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// The application identity already has a synced command set.
    ///
    /// Commands must be cleared before they can be synced again.
    #[error("application '{application_id}' already has synced commands")]
    AlreadySynced {
        /// The application identity that was synced before.
        application_id: String,
    },

    /// A REST call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type for command-lifecycle operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
