use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use bytes::Bytes;

use cubby_core::{FileRecord, Identity};
use cubby_vault::VaultError;

use crate::error::ServerError;

use super::AppState;
use super::schemas::{ErrorResponse, MessageResponse, UploadResponse};

/// `GET /api/files` -- list the caller's files in upload order.
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "Files",
    summary = "List files",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Files in upload order", body = Vec<FileRecord>),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_files(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<Identity>,
) -> Result<impl IntoResponse, ServerError> {
    let files = state.vault.list_files(&identity.username).await?;
    Ok((StatusCode::OK, Json(files)))
}

/// `POST /api/upload` -- store a file from a multipart form.
///
/// Expects a multipart body with a `file` field. Other fields are ignored.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "Files",
    summary = "Upload file",
    security(("bearer" = [])),
    request_body(
        content = Vec<u8>,
        description = "Multipart form with a `file` field",
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing file field", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn upload(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<Identity>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| VaultError::BadRequest(format!("invalid multipart body: {err}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map_or_else(|| "upload".to_owned(), ToOwned::to_owned);
        let data: Bytes = field
            .bytes()
            .await
            .map_err(|err| VaultError::BadRequest(format!("failed to read upload: {err}")))?;

        let record = state
            .vault
            .upload(&identity.username, &file_name, data)
            .await?;

        return Ok((
            StatusCode::OK,
            Json(UploadResponse {
                message: "file uploaded".to_owned(),
                file: record,
            }),
        ));
    }

    Err(VaultError::BadRequest("missing multipart field 'file'".to_owned()).into())
}

/// `GET /api/download/{file_id}` -- stream a file the caller owns.
#[utoipa::path(
    get,
    path = "/api/download/{file_id}",
    tag = "Files",
    summary = "Download file",
    security(("bearer" = [])),
    params(("file_id" = String, Path, description = "File identifier")),
    responses(
        (status = 200, description = "File bytes", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 404, description = "No such file", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn download(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<Identity>,
    Path(file_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let (record, data) = state.vault.download(&identity.username, &file_id).await?;
    Ok(attachment_response(&record.name, data))
}

/// `DELETE /api/files/{file_id}` -- delete a file the caller owns.
#[utoipa::path(
    delete,
    path = "/api/files/{file_id}",
    tag = "Files",
    summary = "Delete file",
    security(("bearer" = [])),
    params(("file_id" = String, Path, description = "File identifier")),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 404, description = "No such file", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn delete_file(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<Identity>,
    Path(file_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    state.vault.delete_file(&identity.username, &file_id).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "file deleted".to_owned(),
        }),
    ))
}

/// Build an octet-stream attachment response for a file body.
pub(super) fn attachment_response(file_name: &str, data: Bytes) -> impl IntoResponse + use<> {
    // Quotes and control characters in the name would corrupt the header.
    let safe_name: String = file_name
        .chars()
        .filter(|c| *c != '"' && !c.is_control())
        .collect();

    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_owned(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{safe_name}\""),
            ),
        ],
        data,
    )
}
