use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use cubby_core::Identity;
use cubby_vault::VaultError;

use crate::error::ServerError;

use super::AppState;
use super::schemas::{ErrorResponse, LoginRequest, LoginResponse, UserResponse};

/// `POST /api/login` -- claim an identity and receive a session token.
///
/// Login is identity claiming, not credential verification: presenting a
/// username is sufficient. The identity is created on first login and
/// reused afterwards.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    summary = "Login",
    request_body(content = LoginRequest, description = "Username to claim"),
    responses(
        (status = 200, description = "Session issued", body = LoginResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
    let Json(body) = body
        .map_err(|rejection| VaultError::BadRequest(format!("malformed body: {rejection}")))?;

    let (identity, token) = state.vault.login(&body.username).await?;

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            token,
            username: identity.username,
        }),
    ))
}

/// `GET /api/user` -- return the identity bound to the presented token.
#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Auth",
    summary = "Current user",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Authenticated caller", body = UserResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    )
)]
pub async fn current_user(
    axum::Extension(identity): axum::Extension<Identity>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(UserResponse {
            username: identity.username,
        }),
    )
}
