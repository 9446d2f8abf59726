//! Cookie Management Infrastructure
//!
//! Set-Cookie building and Cookie header parsing. Deletion is always done by
//! writing an empty value with an expiry at the Unix epoch.

use axum::http::{HeaderMap, header};

/// Expiry written when a cookie is cleared.
pub const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    #[default]
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }

    /// Parse a configuration value, case-insensitive
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(SameSite::Strict),
            "lax" => Some(SameSite::Lax),
            "none" => Some(SameSite::None),
            _ => None,
        }
    }
}

/// Attributes shared by every write of one cookie
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
}

impl CookieConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secure: true,
            http_only: true,
            same_site: SameSite::Strict,
            path: "/".to_string(),
        }
    }

    /// Build Set-Cookie header value carrying `value` for `max_age_secs`
    pub fn build_set_cookie(&self, value: &str, max_age_secs: u64) -> String {
        self.render(value, format!("Max-Age={}", max_age_secs))
    }

    /// Build Set-Cookie header value that expires the cookie
    pub fn build_expired_cookie(&self) -> String {
        self.render("", format!("Expires={}", EPOCH_EXPIRES))
    }

    fn render(&self, value: &str, lifetime: String) -> String {
        let mut parts = vec![format!("{}={}", self.name, value)];

        if self.http_only {
            parts.push("HttpOnly".to_string());
        }
        parts.push(format!("Path={}", self.path));
        parts.push(lifetime);
        parts.push(format!("SameSite={}", self.same_site.as_str()));
        if self.secure {
            parts.push("Secure".to_string());
        }

        parts.join("; ")
    }
}

/// Extract a cookie value from headers.
///
/// Every `Cookie` header is scanned, HTTP/2 clients may send several.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            if key == name {
                Some(value.to_string())
            } else {
                None
            }
        })
}
