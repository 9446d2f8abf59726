//! Session Token Verifier / Issuer
//!
//! Token format: `base64url(claims JSON) "." base64url(HMAC-SHA256(secret, first segment))`.
//! Verification is a pure computation: no I/O, no clock other than the one
//! passed in.

use chrono::{DateTime, Utc};
use std::time::Duration;

use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};

use crate::domain::entity::session::{InvalidReason, SessionClaims, TokenResult, VerifiedSession};
use crate::domain::entity::user::UserIdentity;
use crate::error::{AuthError, AuthResult};

/// Checks signature and expiry of session tokens
#[derive(Clone)]
pub struct TokenVerifier {
    secret: [u8; 32],
}

impl TokenVerifier {
    pub fn new(secret: [u8; 32]) -> Self {
        Self { secret }
    }

    pub fn verify(&self, token: &str) -> TokenResult {
        self.verify_at(token, Utc::now())
    }

    /// Verify against an explicit clock. A token is expired once `exp <= now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> TokenResult {
        match self.check(token, now) {
            Ok(session) => TokenResult::Valid(session),
            Err(reason) => {
                tracing::debug!(reason = %reason, "Session token rejected");
                TokenResult::Invalid(reason)
            }
        }
    }

    fn check(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedSession, InvalidReason> {
        let (payload_b64, signature_b64) =
            token.split_once('.').ok_or(InvalidReason::Malformed)?;
        if payload_b64.is_empty() || signature_b64.contains('.') {
            return Err(InvalidReason::Malformed);
        }

        let signature = from_base64url(signature_b64).map_err(|_| InvalidReason::Malformed)?;
        verify_hmac_sha256(&self.secret, payload_b64.as_bytes(), &signature)
            .map_err(|_| InvalidReason::BadSignature)?;

        let payload = from_base64url(payload_b64).map_err(|_| InvalidReason::Malformed)?;
        let claims: SessionClaims =
            serde_json::from_slice(&payload).map_err(|_| InvalidReason::Malformed)?;

        if claims.exp <= now.timestamp() {
            return Err(InvalidReason::Expired);
        }

        VerifiedSession::try_from(claims)
    }
}

/// Mints session tokens. Used by the in-memory backend and in tests; the
/// production backend signs with the same shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: [u8; 32],
}

impl TokenIssuer {
    pub fn new(secret: [u8; 32]) -> Self {
        Self { secret }
    }

    pub fn issue(&self, user: &UserIdentity, ttl: Duration) -> AuthResult<String> {
        self.issue_at(user, ttl, Utc::now())
    }

    pub fn issue_at(
        &self,
        user: &UserIdentity,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> AuthResult<String> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AuthError::Internal(format!("Invalid session TTL: {e}")))?;
        let claims = SessionClaims::for_user(user, now, now + ttl);
        self.sign(&claims)
    }

    /// Sign arbitrary claims
    pub fn sign(&self, claims: &SessionClaims) -> AuthResult<String> {
        let payload = serde_json::to_vec(claims)
            .map_err(|e| AuthError::Internal(format!("Claims serialization failed: {e}")))?;
        let payload_b64 = to_base64url(&payload);
        let signature = hmac_sha256(&self.secret, payload_b64.as_bytes())?;

        Ok(format!("{}.{}", payload_b64, to_base64url(&signature)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
    use chrono::TimeZone;

    const SECRET: [u8; 32] = [9u8; 32];

    fn user(role: UserRole) -> UserIdentity {
        UserIdentity::new(
            UserId::new("clx-user-1").unwrap(),
            Email::new("test@example.com").unwrap(),
            Some("Test User".to_string()),
            role,
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let token = TokenIssuer::new(SECRET)
            .issue_at(&user(UserRole::Admin), Duration::from_secs(3600), now())
            .unwrap();

        let TokenResult::Valid(session) = TokenVerifier::new(SECRET).verify_at(&token, now())
        else {
            panic!("token should verify");
        };
        assert_eq!(session.user_id.as_str(), "clx-user-1");
        assert_eq!(session.role, UserRole::Admin);
        assert_eq!(session.email.as_deref(), Some("test@example.com"));
        assert_eq!(session.issued_at, now());
        assert_eq!(session.expires_at, now() + chrono::Duration::hours(1));
    }

    #[test]
    fn test_expired_token() {
        let token = TokenIssuer::new(SECRET)
            .issue_at(&user(UserRole::User), Duration::from_secs(60), now())
            .unwrap();
        let verifier = TokenVerifier::new(SECRET);

        assert!(verifier.verify_at(&token, now() + chrono::Duration::seconds(59)).is_valid());
        assert_eq!(
            verifier.verify_at(&token, now() + chrono::Duration::seconds(60)),
            TokenResult::Invalid(InvalidReason::Expired)
        );
    }

    #[test]
    fn test_wrong_secret() {
        let token = TokenIssuer::new(SECRET)
            .issue_at(&user(UserRole::User), Duration::from_secs(60), now())
            .unwrap();

        assert_eq!(
            TokenVerifier::new([1u8; 32]).verify_at(&token, now()),
            TokenResult::Invalid(InvalidReason::BadSignature)
        );
    }

    #[test]
    fn test_tampered_payload() {
        let token = TokenIssuer::new(SECRET)
            .issue_at(&user(UserRole::User), Duration::from_secs(60), now())
            .unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let forged_claims = SessionClaims::for_user(
            &user(UserRole::Admin),
            now(),
            now() + chrono::Duration::seconds(60),
        );
        let forged_payload = to_base64url(&serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{}.{}", forged_payload, signature);

        assert_eq!(
            TokenVerifier::new(SECRET).verify_at(&forged, now()),
            TokenResult::Invalid(InvalidReason::BadSignature)
        );
    }

    #[test]
    fn test_malformed_tokens() {
        let verifier = TokenVerifier::new(SECRET);
        for token in ["", "abc", ".sig", "a.b.c", "payload.!!!"] {
            assert_eq!(
                verifier.verify_at(token, now()),
                TokenResult::Invalid(InvalidReason::Malformed),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_signed_garbage_payload_is_malformed() {
        let payload_b64 = to_base64url(b"not json");
        let signature = hmac_sha256(&SECRET, payload_b64.as_bytes()).unwrap();
        let token = format!("{}.{}", payload_b64, to_base64url(&signature));

        assert_eq!(
            TokenVerifier::new(SECRET).verify_at(&token, now()),
            TokenResult::Invalid(InvalidReason::Malformed)
        );
    }
}
