//! Domain Layer
//!
//! Identities, roles, session claims and the collaborator traits the core
//! talks to. Nothing here performs I/O.

pub mod backend;
pub mod entity;
pub mod value_object;

// Re-exports
pub use backend::{
    BackendError, BackendReply, CredentialBackend, LoginCredentials, SessionSource,
};
pub use entity::session::{InvalidReason, SessionClaims, TokenResult, VerifiedSession};
pub use entity::user::UserIdentity;
pub use value_object::{
    email::Email, route_class::RouteClass, user_id::UserId, user_role::UserRole,
};
