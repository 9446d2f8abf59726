//! Collaborator Traits
//!
//! The core never checks passwords or stores users. It talks to a trusted
//! backend through these interfaces. Implementations are in the infra layer.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::domain::entity::user::UserIdentity;

/// Body of the backend login call
#[derive(Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw backend answer. Interpreting it is the authenticator's job, so a
/// contract violation is handled in one place.
#[derive(Debug, Clone)]
pub struct BackendReply {
    pub status: u16,
    pub body: Option<serde_json::Value>,
}

impl BackendReply {
    pub fn new(status: u16, body: Option<serde_json::Value>) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// Transport failure: refused, reset, DNS, TLS
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// The backend answered with a status the contract does not allow
    #[error("Unexpected backend status: {0}")]
    Status(u16),

    /// Endpoint configuration could not be parsed
    #[error("Invalid backend endpoint: {0}")]
    Endpoint(String),
}

/// Credential check delegated to the backend
#[trait_variant::make(CredentialBackend: Send)]
pub trait LocalCredentialBackend {
    /// Single attempt, no retry
    async fn login(&self, credentials: &LoginCredentials) -> Result<BackendReply, BackendError>;
}

/// Session endpoint polled by the client-side guard
#[trait_variant::make(SessionSource: Send)]
pub trait LocalSessionSource {
    /// `Ok(None)` when the endpoint answers `null`
    async fn fetch_session(&self) -> Result<Option<UserIdentity>, BackendError>;
}
