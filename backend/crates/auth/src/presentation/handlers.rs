//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, SessionStore, SignInInput, SignInUseCase, SignOutUseCase,
};
use crate::domain::backend::CredentialBackend;
use crate::error::AuthResult;
use crate::presentation::dto::{LoginRequest, LoginResponse, MessageResponse, SessionResponse};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<B>
where
    B: CredentialBackend + Clone + Send + Sync + 'static,
{
    pub backend: Arc<B>,
    pub config: Arc<AuthConfig>,
    pub sessions: SessionStore,
}

impl<B> AuthAppState<B>
where
    B: CredentialBackend + Clone + Send + Sync + 'static,
{
    pub fn new(backend: B, config: Arc<AuthConfig>) -> Self {
        Self {
            backend: Arc::new(backend),
            sessions: SessionStore::new(&config),
            config,
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<B>(
    State(state): State<AuthAppState<B>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Response>
where
    B: CredentialBackend + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.backend.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
            callback_url: req.callback_url,
        })
        .await?;

    let mut session = state.sessions.context(&headers);
    session.persist(output.token);

    let mut response = (
        StatusCode::OK,
        Json(LoginResponse {
            user: output.user,
            redirect_to: output.redirect_to,
        }),
    )
        .into_response();
    session.apply(&mut response);

    Ok(response)
}

// ============================================================================
// Session
// ============================================================================

/// GET /api/auth/session
///
/// Polled opportunistically by the client guard, so it answers `null`
/// rather than 401.
pub async fn session<B>(
    State(state): State<AuthAppState<B>>,
    headers: HeaderMap,
) -> Json<Option<SessionResponse>>
where
    B: CredentialBackend + Clone + Send + Sync + 'static,
{
    let use_case = CheckSessionUseCase::new(state.config.clone());
    let user = use_case.execute(&state.sessions.context(&headers));

    Json(user.map(|user| SessionResponse { user }))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
pub async fn sign_out<B>(
    State(state): State<AuthAppState<B>>,
    headers: HeaderMap,
) -> Response
where
    B: CredentialBackend + Clone + Send + Sync + 'static,
{
    let mut session = state.sessions.context(&headers);
    SignOutUseCase::new(state.config.session_secret).execute(&mut session);

    let mut response = (
        StatusCode::OK,
        Json(MessageResponse {
            message: "Signed out successfully".to_string(),
        }),
    )
        .into_response();
    session.apply(&mut response);

    response
}
