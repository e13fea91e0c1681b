use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

use cubby_core::FileRecord;

use super::schemas::{
    ErrorResponse, HealthResponse, LoginRequest, LoginResponse, MessageResponse, ShareResponse,
    UploadResponse, UserResponse,
};

/// OpenAPI document for the Cubby HTTP surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cubby",
        description = "Minimal HTTP file-storage service with bearer sessions and public share links."
    ),
    paths(
        super::health::health,
        super::auth::login,
        super::auth::current_user,
        super::files::list_files,
        super::files::upload,
        super::files::download,
        super::files::delete_file,
        super::shares::create_share,
        super::shares::resolve_share,
    ),
    components(schemas(
        FileRecord,
        LoginRequest,
        LoginResponse,
        UserResponse,
        UploadResponse,
        ShareResponse,
        MessageResponse,
        ErrorResponse,
        HealthResponse,
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme referenced by protected paths.
struct BearerAuth;

impl utoipa::Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .build(),
                ),
            );
        }
    }
}
