use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;

use cubby_core::Identity;

use crate::error::ServerError;

use super::AppState;
use super::files::attachment_response;
use super::schemas::{ErrorResponse, ShareResponse};

/// `POST /api/share/{file_id}` -- create a time-limited public share link.
///
/// Ledger membership is the only authorization check: any owner can mint
/// unlimited shares for a file, each valid until its own expiry.
#[utoipa::path(
    post,
    path = "/api/share/{file_id}",
    tag = "Shares",
    summary = "Share file",
    security(("bearer" = [])),
    params(("file_id" = String, Path, description = "File identifier")),
    responses(
        (status = 200, description = "Share link created", body = ShareResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 404, description = "No such file", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn create_share(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<Identity>,
    headers: HeaderMap,
    Path(file_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let (token, _grant) = state
        .vault
        .create_share(&identity.username, &file_id)
        .await?;

    let base = share_base(&state, &headers);
    Ok((
        StatusCode::OK,
        Json(ShareResponse {
            share_url: format!("{base}/share/{token}"),
        }),
    ))
}

/// `GET /share/{token}` -- resolve a share token and serve the file.
///
/// Anonymous by design; the token is the capability. The grant is
/// re-validated against the owner's ledger, so a share whose file has been
/// deleted reports not-found.
#[utoipa::path(
    get,
    path = "/share/{token}",
    tag = "Shares",
    summary = "Resolve share",
    params(("token" = String, Path, description = "Share token")),
    responses(
        (status = 200, description = "File bytes", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 404, description = "Unknown, expired, or dangling share", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn resolve_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let (_grant, record, data) = state.vault.resolve_share(&token).await?;
    Ok(attachment_response(&record.name, data))
}

/// The base URL for share links: configured external URL when present,
/// otherwise derived from the request's `Host` header.
fn share_base(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(base) = &state.external_url {
        return base.clone();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");

    format!("http://{host}")
}
