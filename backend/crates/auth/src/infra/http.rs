//! HTTP Collaborators
//!
//! reqwest clients for the backend login endpoint and the session endpoint.
//! Single attempt each, relying on the client's own timeout.

use reqwest::Client;
use reqwest::header::COOKIE;
use serde::Deserialize;
use url::Url;

use crate::domain::backend::{
    BackendError, BackendReply, CredentialBackend, LoginCredentials, SessionSource,
};
use crate::domain::entity::user::UserIdentity;

fn parse_endpoint(endpoint: &str) -> Result<Url, BackendError> {
    let url =
        Url::parse(endpoint).map_err(|e| BackendError::Endpoint(format!("{endpoint}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(BackendError::Endpoint(format!("unsupported scheme {other}"))),
    }
}

fn unreachable(err: reqwest::Error) -> BackendError {
    BackendError::Unreachable(err.to_string())
}

/// Posts credentials to the backend login endpoint
#[derive(Debug, Clone)]
pub struct HttpCredentialBackend {
    client: Client,
    login_url: Url,
}

impl HttpCredentialBackend {
    pub fn new(login_url: &str) -> Result<Self, BackendError> {
        Ok(Self {
            client: Client::new(),
            login_url: parse_endpoint(login_url)?,
        })
    }

    pub fn login_url(&self) -> &Url {
        &self.login_url
    }
}

impl CredentialBackend for HttpCredentialBackend {
    async fn login(&self, credentials: &LoginCredentials) -> Result<BackendReply, BackendError> {
        let response = self
            .client
            .post(self.login_url.clone())
            .json(credentials)
            .send()
            .await
            .map_err(unreachable)?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(unreachable)?;
        // Non-JSON bodies are kept as absent, the authenticator decides what that means
        let body = serde_json::from_slice(&bytes).ok();

        tracing::debug!(status, url = %self.login_url, "Backend login answered");

        Ok(BackendReply::new(status, body))
    }
}

#[derive(Deserialize)]
struct SessionBody {
    user: Option<UserIdentity>,
}

/// Polls the session endpoint with the browser's cookie
#[derive(Debug, Clone)]
pub struct HttpSessionSource {
    client: Client,
    session_url: Url,
    cookie: Option<String>,
}

impl HttpSessionSource {
    pub fn new(session_url: &str) -> Result<Self, BackendError> {
        Ok(Self {
            client: Client::new(),
            session_url: parse_endpoint(session_url)?,
            cookie: None,
        })
    }

    /// Send `cookie` as the `Cookie` header on every fetch
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }
}

impl SessionSource for HttpSessionSource {
    async fn fetch_session(&self) -> Result<Option<UserIdentity>, BackendError> {
        let mut request = self.client.get(self.session_url.clone());
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await.map_err(unreachable)?;
        if !response.status().is_success() {
            return Err(BackendError::Status(response.status().as_u16()));
        }

        // `null` and `{}` both mean signed out
        let body: Option<SessionBody> = response.json().await.map_err(unreachable)?;
        Ok(body.and_then(|b| b.user))
    }
}
