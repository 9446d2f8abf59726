//! Gateway Configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).

use anyhow::{Context, bail};
use auth::AuthConfig;
use auth::config::SameSite;
use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    /// Backend login endpoint. `None` selects the in-memory demo accounts.
    pub auth_backend_url: Option<String>,
    pub auth: AuthConfig,
}

impl GatewayConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, so tests need not touch the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut auth = AuthConfig {
            session_secret: session_secret(lookup("SESSION_SECRET"))?,
            cookie_secure: !cfg!(debug_assertions),
            ..AuthConfig::default()
        };

        if let Some(value) = lookup("COOKIE_SECURE") {
            auth.cookie_secure = parse_flag("COOKIE_SECURE", &value)?;
        }
        if let Some(value) = lookup("COOKIE_SAME_SITE") {
            auth.cookie_same_site = SameSite::parse(&value)
                .with_context(|| format!("COOKIE_SAME_SITE: unknown policy {value:?}"))?;
        }
        if let Some(value) = lookup("ROUTES_DEFAULT_DENY") {
            if parse_flag("ROUTES_DEFAULT_DENY", &value)? {
                auth = auth.with_default_deny();
            }
        }

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse()
            .with_context(|| format!("BIND_ADDR: invalid socket address {bind_addr:?}"))?;

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let auth_backend_url = lookup("AUTH_BACKEND_URL").filter(|url| !url.trim().is_empty());

        Ok(Self {
            bind_addr,
            frontend_origins,
            auth_backend_url,
            auth,
        })
    }
}

/// Base64 secret of exactly 32 bytes. Debug builds fall back to a random one.
fn session_secret(value: Option<String>) -> anyhow::Result<[u8; 32]> {
    let Some(encoded) = value else {
        if cfg!(debug_assertions) {
            tracing::warn!("SESSION_SECRET not set, using a random secret for this run");
            return Ok(platform::crypto::random_secret());
        }
        bail!("SESSION_SECRET must be set in production");
    };

    let bytes =
        platform::crypto::from_base64(&encoded).context("SESSION_SECRET is not valid base64")?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes, got {}", bytes.len())
    })
}

fn parse_flag(key: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{key}: expected a boolean, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::guard::UnmatchedPolicy;
    use std::collections::HashMap;

    // 32 bytes of 0x01
    const SECRET_B64: &str = "AQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQE=";

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<GatewayConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("SESSION_SECRET", SECRET_B64)]).unwrap();

        assert_eq!(config.auth.session_secret, [1u8; 32]);
        assert_eq!(config.bind_addr, "0.0.0.0:31113".parse().unwrap());
        assert_eq!(config.frontend_origins.len(), 2);
        assert!(config.auth_backend_url.is_none());
        assert_eq!(config.auth.routes.unmatched, UnmatchedPolicy::Allow);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SESSION_SECRET", SECRET_B64),
            ("COOKIE_SECURE", "true"),
            ("COOKIE_SAME_SITE", "lax"),
            ("ROUTES_DEFAULT_DENY", "1"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("FRONTEND_ORIGINS", "https://inkwell.example, "),
            ("AUTH_BACKEND_URL", "http://backend:4000/api/auth/login"),
        ])
        .unwrap();

        assert!(config.auth.cookie_secure);
        assert_eq!(config.auth.cookie_same_site, SameSite::Lax);
        assert_eq!(config.auth.routes.unmatched, UnmatchedPolicy::Deny);
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.frontend_origins, vec!["https://inkwell.example"]);
        assert_eq!(
            config.auth_backend_url.as_deref(),
            Some("http://backend:4000/api/auth/login")
        );
    }

    #[test]
    fn test_missing_secret_in_debug_is_random() {
        let config = load(&[]).unwrap();
        assert!(config.auth.session_secret.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("SESSION_SECRET", "c2hvcnQ=")]).is_err());
        assert!(load(&[("SESSION_SECRET", "!!!")]).is_err());
        assert!(load(&[("COOKIE_SECURE", "maybe")]).is_err());
        assert!(load(&[("COOKIE_SAME_SITE", "sometimes")]).is_err());
        assert!(load(&[("BIND_ADDR", "nowhere")]).is_err());
    }
}
