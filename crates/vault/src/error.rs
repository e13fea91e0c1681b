use thiserror::Error;

use cubby_blob::BlobError;
use cubby_state::StateError;

/// Errors surfaced by vault operations.
///
/// Every variant maps to exactly one HTTP status at the request boundary;
/// no raw store error escapes uncaught.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Missing, malformed, or expired session token.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The requested file, share, or user does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request was malformed (bad body, missing upload field).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The uploaded body exceeds the configured limit.
    #[error("payload too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge {
        /// Actual size.
        size: u64,
        /// Maximum allowed size.
        limit: u64,
    },

    /// An error occurred in the key-value store.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// An error occurred in the blob store.
    #[error("blob error: {0}")]
    Blob(BlobError),

    /// A stored document failed to serialize or deserialize.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The vault was misconfigured (e.g. missing required stores).
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<BlobError> for VaultError {
    fn from(err: BlobError) -> Self {
        match err {
            BlobError::TooLarge { size, limit } => Self::TooLarge { size, limit },
            other => Self::Blob(other),
        }
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
