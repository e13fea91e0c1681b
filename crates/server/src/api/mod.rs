pub mod auth;
pub mod files;
pub mod health;
pub mod openapi;
pub mod schemas;
pub mod shares;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use cubby_vault::Vault;

use crate::auth::AuthLayer;
use crate::config::{HttpConfig, ServerConfig};
use crate::error::ServerError;

use self::openapi::ApiDoc;

/// Shared state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub vault: Arc<Vault>,
    /// Public base URL for share links; request `Host` header when unset.
    pub external_url: Option<String>,
}

/// Headroom over the configured upload limit for multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the Axum router with all API routes, middleware, and Swagger UI.
///
/// The CORS allow-origin value comes from configuration and is baked into
/// the layer here; there is no process-global CORS state.
pub fn router(
    vault: Arc<Vault>,
    server: &ServerConfig,
    http: &HttpConfig,
) -> Result<Router, ServerError> {
    let state = AppState {
        vault: Arc::clone(&vault),
        external_url: server
            .external_url
            .as_ref()
            .map(|url| url.trim_end_matches('/').to_owned()),
    };

    let cors = cors_layer(&http.cors_allow_origin)?;
    let body_limit = usize::try_from(http.max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    // Routes behind bearer authentication.
    let protected = Router::new()
        .route("/api/user", get(auth::current_user))
        .route("/api/files", get(files::list_files))
        .route("/api/files/{file_id}", delete(files::delete_file))
        .route("/api/upload", post(files::upload))
        .route("/api/download/{file_id}", get(files::download))
        .route("/api/share/{file_id}", post(shares::create_share))
        .layer(AuthLayer::new(vault));

    // Anonymous routes: login, public share resolution, liveness.
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/api/login", post(auth::login))
        .route("/share/{token}", get(shares::resolve_share));

    Ok(Router::new()
        .merge(public)
        .merge(protected)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

/// Build the CORS layer from the configured allow-origin value.
fn cors_layer(allow_origin: &str) -> Result<CorsLayer, ServerError> {
    if allow_origin == "*" {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origin = allow_origin
        .parse::<HeaderValue>()
        .map_err(|_| ServerError::Config(format!("invalid CORS origin: {allow_origin}")))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}
