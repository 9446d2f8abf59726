//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Every variant is caught at the boundary
//! that detects it (guard or handler) and turned into a response there.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde::Serialize;
use thiserror::Error;

use crate::domain::backend::BackendError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Message used whenever the real cause must not be disclosed
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Message shown when the backend could not be reached
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// Why a login was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub reason: String,
    /// The account exists but its email is unverified
    pub requires_verification: bool,
    pub email: Option<String>,
    /// 4xx status to answer with
    pub status: u16,
}

impl Rejection {
    pub fn invalid_credentials() -> Self {
        Self {
            reason: INVALID_CREDENTIALS.to_string(),
            requires_verification: false,
            email: None,
            status: 401,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RejectionBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    requires_verification: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Signature mismatch, decode failure or expiry. Deliberately one variant.
    #[error("Session invalid")]
    InvalidToken,

    /// Credential mismatch or unverified email
    #[error("{}", .0.reason)]
    Rejected(Rejection),

    /// Network failure talking to the credential or session endpoint
    #[error("Backend unreachable: {0}")]
    BackendUnreachable(String),

    /// Valid session, insufficient privilege
    #[error("Insufficient role")]
    RoleMismatch,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn rejected(rejection: Rejection) -> Self {
        AuthError::Rejected(rejection)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Rejected(rejection) => StatusCode::from_u16(rejection.status)
                .ok()
                .filter(StatusCode::is_client_error)
                .unwrap_or(StatusCode::UNAUTHORIZED),
            AuthError::BackendUnreachable(_) => StatusCode::BAD_GATEWAY,
            AuthError::RoleMismatch => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidToken | AuthError::Rejected(_) => ErrorKind::Unauthorized,
            AuthError::BackendUnreachable(_) => ErrorKind::BadGateway,
            AuthError::RoleMismatch => ErrorKind::Forbidden,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError. Backend and internal details stay in the logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::BackendUnreachable(_) => {
                AppError::bad_gateway(GENERIC_FAILURE).with_action("Please try again")
            }
            AuthError::Internal(_) => AppError::internal(GENERIC_FAILURE),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::BackendUnreachable(cause) => {
                tracing::error!(cause = %cause, "Auth backend unreachable");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Rejected(rejection) => {
                tracing::warn!(
                    reason = %rejection.reason,
                    requires_verification = rejection.requires_verification,
                    "Login rejected"
                );
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();

        match &self {
            // Guard denials use the bare `{error}` body APIs expect
            AuthError::InvalidToken | AuthError::RoleMismatch => (
                status,
                Json(serde_json::json!({ "error": self.kind().as_str() })),
            )
                .into_response(),
            AuthError::Rejected(rejection) => {
                let body = RejectionBody {
                    error: &rejection.reason,
                    requires_verification: rejection.requires_verification.then_some(true),
                    email: rejection.email.as_deref(),
                };
                (status, Json(body)).into_response()
            }
            _ => self.to_app_error().into_response(),
        }
    }
}

impl From<BackendError> for AuthError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unreachable(cause) => AuthError::BackendUnreachable(cause),
            BackendError::Status(status) => {
                AuthError::BackendUnreachable(format!("backend answered {status}"))
            }
            BackendError::Endpoint(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<platform::crypto::CryptoError> for AuthError {
    fn from(err: platform::crypto::CryptoError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
