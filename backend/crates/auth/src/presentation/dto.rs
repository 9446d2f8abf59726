//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::UserIdentity;

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Destination preserved by the edge guard's login redirect
    #[serde(default)]
    pub callback_url: Option<String>,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserIdentity,
    /// Where the client navigates next
    pub redirect_to: String,
}

// ============================================================================
// Session
// ============================================================================

/// Session response. The endpoint answers `null` when signed out.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub user: UserIdentity,
}

// ============================================================================
// Sign Out
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
