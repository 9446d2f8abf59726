//! Edge Guard Middleware
//!
//! Runs the edge guard once per request, before any route handler.

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use platform::client::extract_client_ip;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{EdgeGuard, GuardDecision, SessionStore};
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct EdgeGuardState {
    pub guard: Arc<EdgeGuard>,
    pub sessions: SessionStore,
}

impl EdgeGuardState {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            guard: Arc::new(EdgeGuard::new(config)),
            sessions: SessionStore::new(config),
        }
    }
}

/// Allow, redirect or reject. On allow, a verified session is placed in the
/// request extensions as `VerifiedSession`.
pub async fn edge_guard(
    State(state): State<EdgeGuardState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = state.sessions.read_token(req.headers());

    let session = match state.guard.decide(req.uri().path(), token.as_deref()) {
        GuardDecision::Allow { session } => session,
        denied => return deny(&req, denied),
    };

    if let Some(session) = session {
        req.extensions_mut().insert(session);
    }
    next.run(req).await
}

fn deny(req: &Request, decision: GuardDecision) -> Response {
    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let client_ip = extract_client_ip(req.headers(), direct_ip)
        .map(|ip| ip.to_string())
        .unwrap_or_default();
    let path = req.uri().path();

    match decision {
        GuardDecision::RedirectLogin { location } => {
            tracing::info!(
                path = %path,
                client_ip = %client_ip,
                "No valid session, redirecting to login"
            );
            Redirect::temporary(&location).into_response()
        }
        GuardDecision::RedirectDashboard { location } => {
            tracing::info!(
                path = %path,
                client_ip = %client_ip,
                "Redirecting to dashboard"
            );
            Redirect::temporary(&location).into_response()
        }
        GuardDecision::Unauthorized => {
            tracing::info!(
                path = %path,
                client_ip = %client_ip,
                "Rejected API request without session"
            );
            AuthError::InvalidToken.into_response()
        }
        GuardDecision::Forbidden => {
            tracing::warn!(
                path = %path,
                client_ip = %client_ip,
                "Rejected API request with insufficient role"
            );
            AuthError::RoleMismatch.into_response()
        }
        GuardDecision::Allow { .. } => {
            tracing::error!(path = %path, "Allow decision routed to deny");
            AuthError::Internal("guard decision mismatch".to_string()).into_response()
        }
    }
}
