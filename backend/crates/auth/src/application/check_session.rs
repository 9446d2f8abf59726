//! Check Session Use Case
//!
//! Answers the session endpoint: the identity behind the request's cookie,
//! or nothing. Never an error.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_store::SessionContext;
use crate::application::token::TokenVerifier;
use crate::domain::entity::session::VerifiedSession;
use crate::domain::entity::user::UserIdentity;
use crate::domain::value_object::email::Email;

/// Check session use case
pub struct CheckSessionUseCase {
    verifier: TokenVerifier,
}

impl CheckSessionUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self {
            verifier: TokenVerifier::new(config.session_secret),
        }
    }

    pub fn execute(&self, session: &SessionContext<'_>) -> Option<UserIdentity> {
        let verified = self.verifier.verify(session.get()?).into_session()?;
        Self::identity(verified)
    }

    /// Tokens without a usable email cannot describe a user
    fn identity(session: VerifiedSession) -> Option<UserIdentity> {
        let email = session.email.as_deref().and_then(|e| Email::new(e).ok());
        if email.is_none() {
            tracing::debug!(user_id = %session.user_id, "Session token has no usable email");
        }

        Some(UserIdentity::new(
            session.user_id,
            email?,
            session.name,
            session.role,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::session_store::SessionStore;
    use crate::application::token::TokenIssuer;
    use crate::domain::entity::session::SessionClaims;
    use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
    use axum::http::{HeaderMap, HeaderValue, header};
    use chrono::Utc;
    use std::time::Duration;

    fn config() -> Arc<AuthConfig> {
        Arc::new(AuthConfig {
            session_secret: [3u8; 32],
            ..AuthConfig::default()
        })
    }

    fn user() -> UserIdentity {
        UserIdentity::new(
            UserId::new("clx7").unwrap(),
            Email::new("admin@example.com").unwrap(),
            Some("Admin".to_string()),
            UserRole::Admin,
        )
    }

    fn headers_with(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("next-auth.session-token={token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn test_valid_session() {
        let config = config();
        let token = TokenIssuer::new([3u8; 32])
            .issue(&user(), Duration::from_secs(60))
            .unwrap();
        let store = SessionStore::new(&config);
        let headers = headers_with(&token);

        let found = CheckSessionUseCase::new(config).execute(&store.context(&headers));

        assert_eq!(found, Some(user()));
    }

    #[test]
    fn test_no_cookie_or_bad_token() {
        let config = config();
        let store = SessionStore::new(&config);
        let use_case = CheckSessionUseCase::new(config);

        assert_eq!(use_case.execute(&store.context(&HeaderMap::new())), None);
        assert_eq!(use_case.execute(&store.context(&headers_with("a.b"))), None);
    }

    #[test]
    fn test_token_without_email() {
        let config = config();
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "clx8".to_string(),
            role: UserRole::User,
            email: None,
            name: None,
            iat: now,
            exp: now + 60,
        };
        let token = TokenIssuer::new([3u8; 32]).sign(&claims).unwrap();
        let store = SessionStore::new(&config);
        let headers = headers_with(&token);

        assert_eq!(
            CheckSessionUseCase::new(config).execute(&store.context(&headers)),
            None
        );
    }
}
