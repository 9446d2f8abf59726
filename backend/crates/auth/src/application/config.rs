//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use crate::application::route_classifier::{RouteTable, UnmatchedPolicy};

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Cookie written on login
    pub session_cookie_name: String,
    /// Older cookie names still read, and cleared on sign-out
    pub legacy_cookie_names: Vec<String>,
    /// Shared HMAC secret for session tokens (32 bytes)
    pub session_secret: [u8; 32],
    /// Cookie Max-Age and token lifetime (30 days)
    pub session_max_age: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Where unauthenticated navigation is sent
    pub login_path: String,
    /// Where authenticated users are sent away from login and admin pages
    pub dashboard_path: String,
    /// Query parameter holding the original destination
    pub callback_param: String,
    /// How long a fetched client session view stays fresh
    pub session_stale_time: Duration,
    /// Path classification
    pub routes: RouteTable,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "next-auth.session-token".to_string(),
            legacy_cookie_names: vec!["auth_token".to_string(), "auth-token".to_string()],
            session_secret: [0u8; 32],
            session_max_age: Duration::from_secs(30 * 24 * 3600), // 30 days
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            login_path: "/login".to_string(),
            dashboard_path: "/dashboard".to_string(),
            callback_param: "callbackUrl".to_string(),
            session_stale_time: Duration::from_secs(5 * 60),
            routes: RouteTable::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            session_secret: platform::crypto::random_secret(),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Switch unmatched paths from allow to deny
    pub fn with_default_deny(mut self) -> Self {
        self.routes.unmatched = UnmatchedPolicy::Deny;
        self
    }

    /// Session lifetime in whole seconds, as written to `Max-Age`
    pub fn session_max_age_secs(&self) -> u64 {
        self.session_max_age.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();

        assert_eq!(config.session_cookie_name, "next-auth.session-token");
        assert_eq!(config.legacy_cookie_names, vec!["auth_token", "auth-token"]);
        assert_eq!(config.session_max_age_secs(), 2_592_000);
        assert!(config.cookie_secure);
        assert_eq!(config.cookie_same_site, SameSite::Strict);
        assert_eq!(config.callback_param, "callbackUrl");
        assert_eq!(config.routes.unmatched, UnmatchedPolicy::Allow);
    }

    #[test]
    fn test_with_random_secret() {
        let config1 = AuthConfig::with_random_secret();
        let config2 = AuthConfig::with_random_secret();

        assert_ne!(config1.session_secret, config2.session_secret);
    }

    #[test]
    fn test_development_config() {
        let config = AuthConfig::development().with_default_deny();

        assert!(!config.cookie_secure);
        assert!(config.session_secret.iter().any(|&b| b != 0));
        assert_eq!(config.routes.unmatched, UnmatchedPolicy::Deny);
    }
}
