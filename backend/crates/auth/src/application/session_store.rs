//! Session Store
//!
//! Cookie-backed storage of the session token. `SessionStore` holds the
//! cookie settings; each request gets its own `SessionContext`, which is the
//! only place the stored token is mutated.

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::Response;
use platform::cookie::{CookieConfig, extract_cookie};
use std::collections::BTreeMap;

use crate::application::config::AuthConfig;

/// Cookie settings shared by every request
#[derive(Debug, Clone)]
pub struct SessionStore {
    primary: CookieConfig,
    legacy: Vec<CookieConfig>,
    max_age_secs: u64,
}

/// Lifecycle of the session within one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No cookie arrived and nothing was set
    Empty,
    Active(String),
    /// Cleared during this request
    Invalidated,
}

impl SessionStore {
    pub fn new(config: &AuthConfig) -> Self {
        let cookie = |name: &str| CookieConfig {
            secure: config.cookie_secure,
            same_site: config.cookie_same_site,
            ..CookieConfig::new(name)
        };

        Self {
            primary: cookie(&config.session_cookie_name),
            legacy: config
                .legacy_cookie_names
                .iter()
                .map(|name| cookie(name))
                .collect(),
            max_age_secs: config.session_max_age_secs(),
        }
    }

    /// Token carried by the request: primary cookie first, then legacy names in order
    pub fn read_token(&self, headers: &HeaderMap) -> Option<String> {
        std::iter::once(&self.primary)
            .chain(self.legacy.iter())
            .find_map(|cookie| extract_cookie(headers, &cookie.name))
            .filter(|token| !token.is_empty())
    }

    /// Start a session context for one request
    pub fn context(&self, headers: &HeaderMap) -> SessionContext<'_> {
        let state = match self.read_token(headers) {
            Some(token) => SessionState::Active(token),
            None => SessionState::Empty,
        };

        SessionContext {
            store: self,
            state,
            pending: BTreeMap::new(),
        }
    }
}

/// Per-request session object
#[derive(Debug)]
pub struct SessionContext<'a> {
    store: &'a SessionStore,
    state: SessionState,
    /// Set-Cookie values keyed by cookie name; last write wins
    pending: BTreeMap<String, String>,
}

impl SessionContext<'_> {
    pub fn get(&self) -> Option<&str> {
        match &self.state {
            SessionState::Active(token) => Some(token),
            SessionState::Empty | SessionState::Invalidated => None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Store `token` for `max_age_secs` under the primary cookie name
    pub fn set(&mut self, token: impl Into<String>, max_age_secs: u64) {
        let token = token.into();
        let cookie = self.store.primary.build_set_cookie(&token, max_age_secs);

        self.pending.insert(self.store.primary.name.clone(), cookie);
        self.state = SessionState::Active(token);
    }

    /// `set` with the configured session lifetime
    pub fn persist(&mut self, token: impl Into<String>) {
        let max_age = self.store.max_age_secs;
        self.set(token, max_age);
    }

    /// Expire the primary and legacy cookies. Calling it again changes nothing.
    pub fn clear(&mut self) {
        if self.state == SessionState::Invalidated {
            return;
        }

        for cookie in std::iter::once(&self.store.primary).chain(self.store.legacy.iter()) {
            self.pending
                .insert(cookie.name.clone(), cookie.build_expired_cookie());
        }
        self.state = SessionState::Invalidated;
    }

    /// Set-Cookie values waiting to be written
    pub fn pending_cookies(&self) -> impl Iterator<Item = &str> {
        self.pending.values().map(String::as_str)
    }

    /// Append the pending Set-Cookie headers to `response`
    pub fn apply(self, response: &mut Response) {
        let headers = response.headers_mut();

        for (name, cookie) in self.pending {
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    headers.append(header::SET_COOKIE, value);
                }
                Err(e) => {
                    tracing::warn!(cookie = %name, error = %e, "Dropping invalid Set-Cookie value");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    fn store() -> SessionStore {
        SessionStore::new(&AuthConfig::default())
    }

    fn headers(cookie: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(cookie));
        headers
    }

    #[test]
    fn test_empty_context() {
        let store = store();
        let ctx = store.context(&HeaderMap::new());

        assert_eq!(ctx.get(), None);
        assert_eq!(ctx.state(), &SessionState::Empty);
        assert_eq!(ctx.pending_cookies().count(), 0);
    }

    #[test]
    fn test_reads_primary_then_legacy() {
        let store = store();

        let both = headers("auth_token=old; next-auth.session-token=new");
        assert_eq!(store.read_token(&both).as_deref(), Some("new"));

        let legacy = headers("auth-token=legacy");
        assert_eq!(store.read_token(&legacy).as_deref(), Some("legacy"));

        let blank = headers("next-auth.session-token=");
        assert_eq!(store.read_token(&blank), None);
    }

    #[test]
    fn test_set_then_get() {
        let store = store();
        let mut ctx = store.context(&HeaderMap::new());

        ctx.set("tok.sig", 60);

        assert_eq!(ctx.get(), Some("tok.sig"));
        let cookies: Vec<_> = ctx.pending_cookies().collect();
        assert_eq!(
            cookies,
            vec!["next-auth.session-token=tok.sig; HttpOnly; Path=/; Max-Age=60; SameSite=Strict; Secure"]
        );
    }

    #[test]
    fn test_clear_expires_every_name() {
        let store = store();
        let mut ctx = store.context(&headers("next-auth.session-token=abc"));

        ctx.clear();

        assert_eq!(ctx.get(), None);
        assert_eq!(ctx.state(), &SessionState::Invalidated);
        let cookies: Vec<_> = ctx.pending_cookies().collect();
        assert_eq!(cookies.len(), 3);
        for cookie in cookies {
            assert!(cookie.contains("=; HttpOnly; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        }
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = store();
        let mut ctx = store.context(&headers("auth_token=abc"));

        ctx.clear();
        let first: Vec<String> = ctx.pending_cookies().map(str::to_string).collect();
        ctx.clear();
        let second: Vec<String> = ctx.pending_cookies().map(str::to_string).collect();

        assert_eq!(first, second);
        assert_eq!(ctx.get(), None);
    }

    #[test]
    fn test_last_mutation_wins() {
        let store = store();
        let mut ctx = store.context(&HeaderMap::new());

        ctx.persist("first");
        ctx.clear();
        ctx.persist("second");

        assert_eq!(ctx.get(), Some("second"));
        let primary: Vec<_> = ctx
            .pending_cookies()
            .filter(|c| c.starts_with("next-auth.session-token="))
            .collect();
        assert_eq!(primary.len(), 1);
        assert!(primary[0].starts_with("next-auth.session-token=second;"));
        assert!(primary[0].contains("Max-Age=2592000"));
    }

    #[test]
    fn test_apply_appends_headers() {
        let store = SessionStore::new(&AuthConfig::development());
        let mut ctx = store.context(&HeaderMap::new());
        ctx.clear();

        let mut response = "ok".into_response();
        ctx.apply(&mut response);

        let cookies: Vec<_> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 3);
        assert!(cookies.iter().all(|c| !c.contains("Secure")));
    }
}
