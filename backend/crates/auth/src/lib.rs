//! Auth (Authentication) Gateway Module
//!
//! Clean Architecture structure:
//! - `domain/` - Identity, claims, route classes, collaborator traits
//! - `application/` - Token verification, session store, route guards, use cases
//! - `infra/` - HTTP and in-memory collaborator implementations
//! - `presentation/` - HTTP handlers, DTOs, edge guard middleware, router
//!
//! ## Session Model
//! - Stateless signed tokens: `base64url(claims).base64url(HMAC-SHA256)`
//! - Stored in an HTTP-only `SameSite=Strict` cookie, cleared by epoch expiry
//! - Passwords are checked by the backend, never here
//!
//! ## Guards
//! - Edge guard: per-request allow / redirect / 401 / 403 before any handler
//! - Client route guard: loading / render / unauthorized / redirect from the
//!   cached session view

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{HttpCredentialBackend, HttpSessionSource, InMemoryCredentialBackend};
pub use presentation::middleware::{EdgeGuardState, edge_guard};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod guard {
    pub use crate::application::client_guard::*;
    pub use crate::application::edge_guard::*;
    pub use crate::application::route_classifier::*;
}
