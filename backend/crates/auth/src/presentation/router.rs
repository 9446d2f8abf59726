//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::backend::CredentialBackend;
use crate::presentation::handlers::{self, AuthAppState};

/// Auth routes, to be nested under `/api/auth`
pub fn auth_router<B>(backend: B, config: Arc<AuthConfig>) -> Router
where
    B: CredentialBackend + Clone + Send + Sync + 'static,
{
    let state = AuthAppState::new(backend, config);

    Router::new()
        .route("/login", post(handlers::login::<B>))
        .route("/session", get(handlers::session::<B>))
        .route("/signout", post(handlers::sign_out::<B>))
        .with_state(state)
}
