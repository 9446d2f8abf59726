//! Edge Guard
//!
//! Per-request access decision taken before any page or API handler runs.
//! Pure function of path, cookie token and clock: no I/O, no suspension.

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::application::route_classifier::RouteTable;
use crate::application::token::TokenVerifier;
use crate::domain::entity::session::VerifiedSession;
use crate::domain::value_object::route_class::RouteClass;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Continue. `session` is set when a valid token was presented.
    Allow { session: Option<VerifiedSession> },
    /// Page navigation without a valid session
    RedirectLogin { location: String },
    /// Signed-in user on the login page, or non-admin on an admin page
    RedirectDashboard { location: String },
    /// API request without a valid session
    Unauthorized,
    /// API request with a valid session but insufficient role
    Forbidden,
}

impl GuardDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, GuardDecision::Allow { .. })
    }
}

#[derive(Clone)]
pub struct EdgeGuard {
    verifier: TokenVerifier,
    routes: RouteTable,
    login_path: String,
    dashboard_path: String,
    callback_param: String,
}

impl EdgeGuard {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            verifier: TokenVerifier::new(config.session_secret),
            routes: config.routes.clone(),
            login_path: config.login_path.clone(),
            dashboard_path: config.dashboard_path.clone(),
            callback_param: config.callback_param.clone(),
        }
    }

    pub fn decide(&self, path: &str, token: Option<&str>) -> GuardDecision {
        self.decide_at(path, token, Utc::now())
    }

    pub fn decide_at(&self, path: &str, token: Option<&str>, now: DateTime<Utc>) -> GuardDecision {
        // Explicit public prefixes skip verification entirely
        if path == "/" || self.routes.resolve(path) == Some(RouteClass::Public) {
            return GuardDecision::Allow { session: None };
        }

        let class = self.routes.classify(path);
        let is_api = self.routes.is_api(path);
        let session = token.and_then(|t| self.verifier.verify_at(t, now).into_session());

        let Some(session) = session else {
            // The API namespace is guarded even where no prefix lists the path
            if is_api {
                return GuardDecision::Unauthorized;
            }
            if !class.requires_session() {
                return GuardDecision::Allow { session: None };
            }
            return GuardDecision::RedirectLogin {
                location: self.login_redirect(path),
            };
        };

        if class == RouteClass::AdminOnly && !session.role.is_admin() {
            if is_api {
                return GuardDecision::Forbidden;
            }
            return self.to_dashboard();
        }

        if self.routes.is_auth_page(path) {
            return self.to_dashboard();
        }

        GuardDecision::Allow {
            session: Some(session),
        }
    }

    /// `/login?callbackUrl=<urlencoded path>`
    pub fn login_redirect(&self, path: &str) -> String {
        login_location(&self.login_path, &self.callback_param, path)
    }

    fn to_dashboard(&self) -> GuardDecision {
        GuardDecision::RedirectDashboard {
            location: self.dashboard_path.clone(),
        }
    }
}

/// Login URL carrying `return_to` as a form-urlencoded query parameter
pub fn login_location(login_path: &str, callback_param: &str, return_to: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(return_to.as_bytes()).collect();
    format!("{}?{}={}", login_path, callback_param, encoded)
}
