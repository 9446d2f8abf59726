//! User Identity
//!
//! Read-only view of a registry user. The core only ever receives it from a
//! login response or rebuilds it from verified claims.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: UserId,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

impl UserIdentity {
    pub fn new(id: UserId, email: Email, name: Option<String>, role: UserRole) -> Self {
        Self {
            id,
            email,
            name,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_user() {
        let json = r#"{"id":"clx1","email":"Test@Example.com","name":"Test","role":"ADMIN"}"#;
        let user: UserIdentity = serde_json::from_str(json).unwrap();

        assert_eq!(user.id.as_str(), "clx1");
        assert_eq!(user.email.as_str(), "test@example.com");
        assert_eq!(user.name.as_deref(), Some("Test"));
        assert_eq!(user.role, UserRole::Admin);
    }

    #[test]
    fn test_role_defaults_to_user() {
        let json = r#"{"id":"clx2","email":"a@b.io"}"#;
        let user: UserIdentity = serde_json::from_str(json).unwrap();

        assert_eq!(user.role, UserRole::User);
        assert!(user.name.is_none());
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let json = r#"{"email":"a@b.io","role":"USER"}"#;
        assert!(serde_json::from_str::<UserIdentity>(json).is_err());
    }
}
