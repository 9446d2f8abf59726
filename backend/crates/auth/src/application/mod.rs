//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod check_session;
pub mod client_guard;
pub mod config;
pub mod edge_guard;
pub mod route_classifier;
pub mod session_store;
pub mod sign_in;
pub mod sign_out;
pub mod token;

// Re-exports
pub use authenticate::{Authenticated, CredentialAuthenticator};
pub use check_session::CheckSessionUseCase;
pub use client_guard::{
    ClientGuardOutcome, ClientRouteGuard, ProtectedRoute, SessionQuery, SessionStatus, SessionView,
};
pub use config::AuthConfig;
pub use edge_guard::{EdgeGuard, GuardDecision};
pub use route_classifier::{RouteTable, UnmatchedPolicy};
pub use session_store::{SessionContext, SessionState, SessionStore};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use token::{TokenIssuer, TokenVerifier};
