//! In-Memory Credential Backend
//!
//! Seeded accounts answering the same wire contract as the real backend.
//! Used when no backend URL is configured, and in tests.

use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

use platform::crypto::constant_time_eq;

use crate::application::token::TokenIssuer;
use crate::domain::backend::{BackendError, BackendReply, CredentialBackend, LoginCredentials};
use crate::domain::entity::user::UserIdentity;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
use crate::error::INVALID_CREDENTIALS;

const VERIFY_EMAIL_MESSAGE: &str = "Please verify your email before signing in";

#[derive(Debug, Clone)]
struct Account {
    user: UserIdentity,
    password: String,
    email_verified: bool,
}

#[derive(Clone)]
pub struct InMemoryCredentialBackend {
    accounts: HashMap<String, Account>,
    issuer: TokenIssuer,
    ttl: Duration,
}

impl InMemoryCredentialBackend {
    /// Empty backend signing with `session_secret`
    pub fn new(session_secret: [u8; 32], ttl: Duration) -> Self {
        Self {
            accounts: HashMap::new(),
            issuer: TokenIssuer::new(session_secret),
            ttl,
        }
    }

    /// Development accounts: a user, an admin and one unverified signup
    pub fn with_demo_accounts(session_secret: [u8; 32], ttl: Duration) -> Self {
        let demo = |id: &str, email: &str, name: &str, role: UserRole| -> Option<UserIdentity> {
            Some(UserIdentity::new(
                UserId::new(id).ok()?,
                Email::new(email).ok()?,
                Some(name.to_string()),
                role,
            ))
        };

        let mut backend = Self::new(session_secret, ttl);
        let seeds = [
            (
                demo("demo-user", "test@example.com", "Test User", UserRole::User),
                "password123",
                true,
            ),
            (
                demo("demo-admin", "admin@example.com", "Admin", UserRole::Admin),
                "admin123",
                true,
            ),
            (
                demo("demo-pending", "pending@example.com", "Pending", UserRole::User),
                "pending123",
                false,
            ),
        ];
        for (user, password, verified) in seeds {
            if let Some(user) = user {
                backend = backend.with_account(user, password, verified);
            }
        }
        backend
    }

    pub fn with_account(
        mut self,
        user: UserIdentity,
        password: &str,
        email_verified: bool,
    ) -> Self {
        self.accounts.insert(
            user.email.to_string(),
            Account {
                user,
                password: password.to_string(),
                email_verified,
            },
        );
        self
    }

    fn answer(&self, credentials: &LoginCredentials) -> Result<BackendReply, BackendError> {
        let account = self
            .accounts
            .get(&credentials.email)
            .filter(|a| constant_time_eq(a.password.as_bytes(), credentials.password.as_bytes()));

        let Some(account) = account else {
            return Ok(BackendReply::new(401, Some(json!({ "error": INVALID_CREDENTIALS }))));
        };

        if !account.email_verified {
            return Ok(BackendReply::new(
                403,
                Some(json!({
                    "error": VERIFY_EMAIL_MESSAGE,
                    "requiresVerification": true,
                    "email": account.user.email,
                })),
            ));
        }

        let token = match self.issuer.issue(&account.user, self.ttl) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(error = %e, "Failed to issue session token");
                return Ok(BackendReply::new(500, None));
            }
        };

        Ok(BackendReply::new(
            200,
            Some(json!({ "user": account.user, "token": token })),
        ))
    }
}

impl CredentialBackend for InMemoryCredentialBackend {
    async fn login(&self, credentials: &LoginCredentials) -> Result<BackendReply, BackendError> {
        self.answer(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::token::TokenVerifier;
    use crate::domain::entity::session::TokenResult;

    const SECRET: [u8; 32] = [4u8; 32];

    fn backend() -> InMemoryCredentialBackend {
        InMemoryCredentialBackend::with_demo_accounts(SECRET, Duration::from_secs(600))
    }

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_valid_login_issues_verifiable_token() {
        let reply = backend()
            .login(&credentials("admin@example.com", "admin123"))
            .await
            .unwrap();

        assert_eq!(reply.status, 200);
        let body = reply.body.unwrap();
        assert_eq!(body["user"]["role"], "ADMIN");

        let token = body["token"].as_str().unwrap();
        let TokenResult::Valid(session) = TokenVerifier::new(SECRET).verify(token) else {
            panic!("issued token should verify");
        };
        assert!(session.role.is_admin());
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let backend = backend();

        let wrong = backend
            .login(&credentials("test@example.com", "wrongpass"))
            .await
            .unwrap();
        let unknown = backend
            .login(&credentials("nobody@example.com", "password123"))
            .await
            .unwrap();

        assert_eq!(wrong.status, 401);
        assert_eq!(wrong.body, unknown.body);
        assert_eq!(wrong.body.unwrap()["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_unverified_account() {
        let reply = backend()
            .login(&credentials("pending@example.com", "pending123"))
            .await
            .unwrap();

        assert_eq!(reply.status, 403);
        let body = reply.body.unwrap();
        assert_eq!(body["requiresVerification"], true);
        assert_eq!(body["email"], "pending@example.com");
    }

    #[tokio::test]
    async fn test_unverified_needs_correct_password() {
        let reply = backend()
            .login(&credentials("pending@example.com", "nope"))
            .await
            .unwrap();

        assert_eq!(reply.status, 401);
    }
}
