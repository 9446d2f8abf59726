//! Route Classifier
//!
//! Static partition of path prefixes into access tiers. A path matches a
//! prefix when it equals it or continues with `/`. Public is checked first,
//! then Protected, then AdminOnly.

use crate::domain::value_object::route_class::RouteClass;

/// What to do with paths no prefix claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmatchedPolicy {
    /// Treat as public (historical behaviour)
    #[default]
    Allow,
    /// Treat as protected
    Deny,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    pub public: Vec<String>,
    pub protected: Vec<String>,
    pub admin_only: Vec<String>,
    /// Namespace whose failures answer 401 instead of redirecting
    pub api_prefix: String,
    /// Login and registration pages. Never denied; signed-in users are bounced.
    pub auth_pages: Vec<String>,
    pub unmatched: UnmatchedPolicy,
}

impl Default for RouteTable {
    fn default() -> Self {
        fn owned(paths: &[&str]) -> Vec<String> {
            paths.iter().map(|p| p.to_string()).collect()
        }

        Self {
            public: owned(&[
                "/api/auth",
                "/api/health",
                "/about",
                "/pricing",
                "/forgot-password",
                "/reset-password",
                "/verify-email",
            ]),
            protected: owned(&[
                "/dashboard",
                "/documents",
                "/editor",
                "/settings",
                "/profile",
                "/analytics",
            ]),
            admin_only: owned(&["/admin", "/api/admin"]),
            api_prefix: "/api".to_string(),
            auth_pages: owned(&["/login", "/register"]),
            unmatched: UnmatchedPolicy::Allow,
        }
    }
}

impl RouteTable {
    /// Explicit class of `path`, `None` when no prefix claims it
    pub fn resolve(&self, path: &str) -> Option<RouteClass> {
        if any_prefix(&self.public, path) {
            Some(RouteClass::Public)
        } else if any_prefix(&self.protected, path) {
            Some(RouteClass::Protected)
        } else if any_prefix(&self.admin_only, path) {
            Some(RouteClass::AdminOnly)
        } else {
            None
        }
    }

    /// Class of `path` with the unmatched policy applied. Unlisted paths in
    /// the API namespace are always Protected.
    pub fn classify(&self, path: &str) -> RouteClass {
        self.resolve(path).unwrap_or_else(|| {
            if self.is_auth_page(path) {
                return RouteClass::Public;
            }
            if self.is_api(path) {
                return RouteClass::Protected;
            }
            match self.unmatched {
                UnmatchedPolicy::Allow => RouteClass::Public,
                UnmatchedPolicy::Deny => RouteClass::Protected,
            }
        })
    }

    pub fn is_api(&self, path: &str) -> bool {
        matches_prefix(path, &self.api_prefix)
    }

    pub fn is_auth_page(&self, path: &str) -> bool {
        any_prefix(&self.auth_pages, path)
    }
}

/// `path` equals `prefix` or starts with `prefix + "/"`
pub fn matches_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn any_prefix(prefixes: &[String], path: &str) -> bool {
    prefixes.iter().any(|prefix| matches_prefix(path, prefix))
}
