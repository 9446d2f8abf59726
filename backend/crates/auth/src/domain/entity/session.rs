//! Session Token Claims
//!
//! Payload carried inside a signed session token and the outcome of
//! verifying one.

use chrono::{DateTime, TimeZone, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::UserIdentity;
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};

/// Signed payload. Timestamps are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn for_user(
        user: &UserIdentity,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user.id.to_string(),
            role: user.role,
            email: Some(user.email.to_string()),
            name: user.name.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }
}

/// Identity extracted from a token that passed signature and expiry checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSession {
    pub user_id: UserId,
    pub role: UserRole,
    pub email: Option<String>,
    pub name: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<SessionClaims> for VerifiedSession {
    type Error = InvalidReason;

    fn try_from(claims: SessionClaims) -> Result<Self, Self::Error> {
        let user_id = UserId::new(claims.sub).map_err(|_| InvalidReason::Malformed)?;
        let issued_at = Utc
            .timestamp_opt(claims.iat, 0)
            .single()
            .ok_or(InvalidReason::Malformed)?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(InvalidReason::Malformed)?;

        Ok(Self {
            user_id,
            role: claims.role,
            email: claims.email,
            name: claims.name,
            issued_at,
            expires_at,
        })
    }
}

/// Why a token was refused. Logged, never shown to callers: every
/// `Invalid` result is handled the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InvalidReason {
    #[display("malformed")]
    Malformed,
    #[display("bad signature")]
    BadSignature,
    #[display("expired")]
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenResult {
    Valid(VerifiedSession),
    Invalid(InvalidReason),
}

impl TokenResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenResult::Valid(_))
    }

    pub fn into_session(self) -> Option<VerifiedSession> {
        match self {
            TokenResult::Valid(session) => Some(session),
            TokenResult::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> SessionClaims {
        SessionClaims {
            sub: "clx1".to_string(),
            role: UserRole::Admin,
            email: Some("a@b.io".to_string()),
            name: None,
            iat: 1_700_000_000,
            exp: 1_700_003_600,
        }
    }

    #[test]
    fn test_claims_wire_shape() {
        let json = serde_json::to_value(claims()).unwrap();
        assert_eq!(json["sub"], "clx1");
        assert_eq!(json["role"], "ADMIN");
        assert_eq!(json["exp"], 1_700_003_600);
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_verified_session_from_claims() {
        let session = VerifiedSession::try_from(claims()).unwrap();
        assert_eq!(session.user_id.as_str(), "clx1");
        assert_eq!(session.role, UserRole::Admin);
        assert_eq!(session.expires_at.timestamp(), 1_700_003_600);
    }

    #[test]
    fn test_blank_subject_is_malformed() {
        let claims = SessionClaims {
            sub: " ".to_string(),
            ..claims()
        };
        assert_eq!(
            VerifiedSession::try_from(claims),
            Err(InvalidReason::Malformed)
        );
    }

    #[test]
    fn test_token_result_into_session() {
        assert!(TokenResult::Invalid(InvalidReason::Expired).into_session().is_none());
        let valid = TokenResult::Valid(VerifiedSession::try_from(claims()).unwrap());
        assert!(valid.is_valid());
        assert!(valid.into_session().is_some());
    }
}
