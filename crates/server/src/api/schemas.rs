use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use cubby_core::FileRecord;

/// Login request body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username to claim. Used verbatim; no normalization.
    #[schema(example = "alice")]
    pub username: String,
}

/// Successful login response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Opaque bearer token for subsequent requests.
    pub token: String,
    /// The claimed username, echoed back.
    #[schema(example = "alice")]
    pub username: String,
}

/// The authenticated caller.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Username bound to the presented token.
    #[schema(example = "alice")]
    pub username: String,
}

/// Successful upload response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Human-readable confirmation.
    #[schema(example = "file uploaded")]
    pub message: String,
    /// The ledger record created for the upload.
    pub file: FileRecord,
}

/// Successful share creation response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShareResponse {
    /// Public URL resolving to the shared file.
    #[schema(example = "http://localhost:8080/share/abc123")]
    pub share_url: String,
}

/// Generic confirmation message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    #[schema(example = "file deleted")]
    pub message: String,
}

/// Error payload returned with every non-2xx JSON response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    #[schema(example = "not found: file-id")]
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status indicator.
    #[schema(example = "ok")]
    pub status: String,
}
