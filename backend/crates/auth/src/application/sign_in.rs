//! Sign In Use Case
//!
//! Authenticates against the backend and works out where the browser goes
//! next. Persisting the token is left to the caller's session context.

use std::sync::Arc;

use crate::application::authenticate::CredentialAuthenticator;
use crate::application::config::AuthConfig;
use crate::domain::backend::CredentialBackend;
use crate::domain::entity::user::UserIdentity;
use crate::error::AuthResult;

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
    /// Destination preserved by an earlier login redirect
    pub callback_url: Option<String>,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub user: UserIdentity,
    /// Session token for cookie
    pub token: String,
    pub redirect_to: String,
}

/// Sign in use case
pub struct SignInUseCase<B>
where
    B: CredentialBackend,
{
    authenticator: CredentialAuthenticator<B>,
    config: Arc<AuthConfig>,
}

impl<B> SignInUseCase<B>
where
    B: CredentialBackend,
{
    pub fn new(backend: Arc<B>, config: Arc<AuthConfig>) -> Self {
        Self {
            authenticator: CredentialAuthenticator::new(backend),
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let authenticated = self
            .authenticator
            .authenticate(&input.email, &input.password)
            .await?;

        let redirect_to = safe_callback(input.callback_url.as_deref())
            .unwrap_or(self.config.dashboard_path.as_str())
            .to_string();

        tracing::info!(
            user_id = %authenticated.user.id,
            role = %authenticated.user.role,
            redirect_to = %redirect_to,
            "User signed in"
        );

        Ok(SignInOutput {
            user: authenticated.user,
            token: authenticated.token,
            redirect_to,
        })
    }
}

/// Accept only same-site relative paths as a post-login destination
pub fn safe_callback(callback: Option<&str>) -> Option<&str> {
    callback
        .map(str::trim)
        .filter(|c| c.starts_with('/') && !c.starts_with("//") && !c.contains('\\'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backend::{BackendError, BackendReply, LoginCredentials};
    use crate::error::AuthError;
    use serde_json::json;

    struct FixedBackend(BackendReply);

    impl CredentialBackend for FixedBackend {
        async fn login(&self, _: &LoginCredentials) -> Result<BackendReply, BackendError> {
            Ok(self.0.clone())
        }
    }

    fn use_case(reply: BackendReply) -> SignInUseCase<FixedBackend> {
        SignInUseCase::new(
            Arc::new(FixedBackend(reply)),
            Arc::new(AuthConfig::default()),
        )
    }

    fn ok_reply() -> BackendReply {
        BackendReply::new(
            200,
            Some(json!({
                "user": {"id": "clx1", "email": "test@example.com", "role": "USER"},
                "token": "tok.sig"
            })),
        )
    }

    fn input(callback_url: Option<&str>) -> SignInInput {
        SignInInput {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
            callback_url: callback_url.map(str::to_string),
        }
    }

    #[test]
    fn test_safe_callback() {
        assert_eq!(safe_callback(Some("/documents/42")), Some("/documents/42"));
        assert_eq!(safe_callback(Some("/editor?id=1")), Some("/editor?id=1"));
        assert_eq!(safe_callback(Some("https://evil.example")), None);
        assert_eq!(safe_callback(Some("//evil.example")), None);
        assert_eq!(safe_callback(Some("/\\evil.example")), None);
        assert_eq!(safe_callback(None), None);
    }

    #[tokio::test]
    async fn test_redirects_to_dashboard_by_default() {
        let output = use_case(ok_reply()).execute(input(None)).await.unwrap();

        assert_eq!(output.redirect_to, "/dashboard");
        assert_eq!(output.token, "tok.sig");
        assert_eq!(output.user.id.as_str(), "clx1");
    }

    #[tokio::test]
    async fn test_honours_callback() {
        let output = use_case(ok_reply())
            .execute(input(Some("/documents/42")))
            .await
            .unwrap();

        assert_eq!(output.redirect_to, "/documents/42");
    }

    #[tokio::test]
    async fn test_ignores_offsite_callback() {
        let output = use_case(ok_reply())
            .execute(input(Some("https://evil.example/steal")))
            .await
            .unwrap();

        assert_eq!(output.redirect_to, "/dashboard");
    }

    #[tokio::test]
    async fn test_rejection_propagates() {
        let reply = BackendReply::new(401, Some(json!({"error": "Invalid credentials"})));

        let err = use_case(reply).execute(input(None)).await.unwrap_err();

        assert!(matches!(err, AuthError::Rejected(_)));
    }
}
