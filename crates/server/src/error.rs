use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use cubby_vault::VaultError;

/// Errors that can occur when running the Cubby server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A vault-level error surfaced through the API.
    #[error(transparent)]
    Vault(#[from] VaultError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Vault(err) => (status_for(err), err.to_string()),
            Self::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            Self::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

/// Map the vault taxonomy onto HTTP statuses.
fn status_for(err: &VaultError) -> StatusCode {
    match err {
        VaultError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        VaultError::NotFound(_) => StatusCode::NOT_FOUND,
        VaultError::BadRequest(_) => StatusCode::BAD_REQUEST,
        VaultError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        VaultError::State(_)
        | VaultError::Blob(_)
        | VaultError::Serialization(_)
        | VaultError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        assert_eq!(
            status_for(&VaultError::Unauthenticated("x".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&VaultError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&VaultError::BadRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&VaultError::TooLarge { size: 2, limit: 1 }),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_for(&VaultError::Serialization("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
