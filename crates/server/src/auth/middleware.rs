use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use tower::{Layer, Service};

use cubby_vault::Vault;

/// Tower layer that adds bearer-token authentication.
///
/// Every request must carry `Authorization: Bearer <token>`; the token is
/// resolved through the vault on each request (no in-process cache), and
/// the resulting [`Identity`](cubby_core::Identity) is injected as a
/// request extension for handlers. Missing, malformed, and expired
/// credentials all produce the same 401 JSON body.
#[derive(Clone)]
pub struct AuthLayer {
    vault: Arc<Vault>,
}

impl AuthLayer {
    pub fn new(vault: Arc<Vault>) -> Self {
        Self { vault }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            vault: Arc::clone(&self.vault),
        }
    }
}

/// Tower service that authenticates requests.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    vault: Arc<Vault>,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let vault = Arc::clone(&self.vault);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let token = req
                .headers()
                .get("authorization")
                .and_then(|value| value.to_str().ok())
                .and_then(|header| header.strip_prefix("Bearer "));

            let Some(token) = token else {
                return Ok(unauthorized("missing bearer token"));
            };

            match vault.authenticate(token).await {
                Ok(identity) => {
                    req.extensions_mut().insert(identity);
                    inner.call(req).await
                }
                Err(err) => Ok(unauthorized(&err.to_string())),
            }
        })
    }
}

fn unauthorized(message: &str) -> Response {
    let body = serde_json::json!({ "error": message });
    (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
}
