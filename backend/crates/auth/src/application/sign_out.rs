//! Sign Out Use Case
//!
//! Tokens are stateless, so signing out only expires the cookies.

use crate::application::session_store::SessionContext;
use crate::application::token::TokenVerifier;

/// Sign out use case
pub struct SignOutUseCase {
    verifier: TokenVerifier,
}

impl SignOutUseCase {
    pub fn new(session_secret: [u8; 32]) -> Self {
        Self {
            verifier: TokenVerifier::new(session_secret),
        }
    }

    pub fn execute(&self, session: &mut SessionContext<'_>) {
        let user_id = session
            .get()
            .and_then(|token| self.verifier.verify(token).into_session())
            .map(|s| s.user_id.to_string());

        session.clear();

        match user_id {
            Some(user_id) => tracing::info!(user_id = %user_id, "User signed out"),
            None => tracing::debug!("Sign out without a valid session"),
        }
    }
}
