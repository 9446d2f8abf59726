//! Gateway Routes
//!
//! Auth API, health check and a placeholder page renderer, all behind the
//! edge guard.

use auth::config::AuthConfig;
use auth::domain::{CredentialBackend, VerifiedSession};
use auth::{EdgeGuardState, auth_router, edge_guard};
use axum::extract::Request;
use axum::http::{HeaderValue, Method, header};
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use kernel::error::app_error::AppError;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

const SERVICE_NAME: &str = "inkwell-gateway";

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageResponse {
    path: String,
    user_id: Option<String>,
    role: Option<&'static str>,
}

/// GET /api/health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
    })
}

/// Stand-in for the page renderer. Unknown API paths are 404.
async fn page(req: Request) -> Response {
    let path = req.uri().path().to_string();

    if auth::guard::matches_prefix(&path, "/api") {
        return AppError::not_found(format!("No API route for {path}")).into_response();
    }

    let session = req.extensions().get::<VerifiedSession>();
    Json(PageResponse {
        user_id: session.map(|s| s.user_id.to_string()),
        role: session.map(|s| s.role.code()),
        path,
    })
    .into_response()
}

fn cors(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::COOKIE,
        ]))
        .allow_credentials(true)
}

/// Full application router
pub fn build_app<B>(backend: B, auth_config: AuthConfig, frontend_origins: &[String]) -> Router
where
    B: CredentialBackend + Clone + Send + Sync + 'static,
{
    let guard_state = EdgeGuardState::new(&auth_config);
    let auth_config = Arc::new(auth_config);

    Router::new()
        .nest("/api/auth", auth_router(backend, auth_config))
        .route("/api/health", get(health))
        .fallback(page)
        .layer(from_fn_with_state(guard_state, edge_guard))
        .layer(TraceLayer::new_for_http())
        .layer(cors(frontend_origins))
}
