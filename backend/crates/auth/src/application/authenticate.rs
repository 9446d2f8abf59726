//! Credential Authenticator
//!
//! Forwards an email/password pair to the trusted backend and interprets
//! its answer. The password check itself happens on the backend.

use serde::Deserialize;
use std::sync::Arc;

use crate::domain::backend::{BackendReply, CredentialBackend, LoginCredentials};
use crate::domain::entity::user::UserIdentity;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult, INVALID_CREDENTIALS, Rejection};

/// Successful login
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: UserIdentity,
    /// Opaque session token, handed to the session store
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct SuccessBody {
    user: Option<UserIdentity>,
    token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: Option<String>,
    #[serde(default)]
    requires_verification: bool,
    email: Option<String>,
}

pub struct CredentialAuthenticator<B>
where
    B: CredentialBackend,
{
    backend: Arc<B>,
}

impl<B> CredentialAuthenticator<B>
where
    B: CredentialBackend,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Single attempt. Errors are `Rejected` or `BackendUnreachable`.
    pub async fn authenticate(&self, email: &str, password: &str) -> AuthResult<Authenticated> {
        let email = Email::new(email)
            .map_err(|_| AuthError::rejected(Rejection::invalid_credentials()))?;

        let credentials = LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        let reply = self.backend.login(&credentials).await?;

        if reply.is_server_error() {
            return Err(AuthError::BackendUnreachable(format!(
                "login endpoint answered {}",
                reply.status
            )));
        }

        if reply.is_success() {
            let status = reply.status;
            return Self::accept(reply).ok_or_else(|| {
                tracing::warn!(
                    status = status,
                    "Login reply lacks user or token, treating as rejection"
                );
                AuthError::rejected(Rejection::invalid_credentials())
            });
        }

        Err(AuthError::rejected(Self::rejection(&reply)))
    }

    fn accept(reply: BackendReply) -> Option<Authenticated> {
        let body: SuccessBody = serde_json::from_value(reply.body?).ok()?;
        let token = body.token.filter(|t| !t.is_empty())?;

        Some(Authenticated {
            user: body.user?,
            token,
        })
    }

    fn rejection(reply: &BackendReply) -> Rejection {
        let body: ErrorBody = reply
            .body
            .clone()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default();

        Rejection {
            reason: body
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| INVALID_CREDENTIALS.to_string()),
            requires_verification: body.requires_verification,
            email: body.email,
            status: reply.status,
        }
    }
}
