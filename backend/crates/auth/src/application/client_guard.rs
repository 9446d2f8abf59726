//! Client Route Guard
//!
//! Rendering-time companion of the edge guard. A shared `SessionQuery`
//! caches the session endpoint's answer and publishes it over a watch
//! channel; every mounted `ProtectedRoute` re-evaluates when it changes.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::application::config::AuthConfig;
use crate::application::edge_guard::login_location;
use crate::domain::backend::SessionSource;
use crate::domain::entity::user::UserIdentity;
use crate::domain::value_object::user_role::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Authenticated,
    Unauthenticated,
}

/// Client-side view of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub status: SessionStatus,
    pub user: Option<UserIdentity>,
}

impl SessionView {
    pub fn loading() -> Self {
        Self {
            status: SessionStatus::Loading,
            user: None,
        }
    }

    pub fn authenticated(user: UserIdentity) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            user: Some(user),
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            user: None,
        }
    }

    fn from_user(user: Option<UserIdentity>) -> Self {
        user.map_or_else(Self::unauthenticated, Self::authenticated)
    }
}

/// What a protected view should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientGuardOutcome {
    /// Placeholder while the session fetch is pending
    Loading,
    Render,
    /// Signed in without the required role. Rendered in place, no navigation.
    Unauthorized,
    /// Navigate to the login page
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct ClientRouteGuard {
    login_path: String,
    callback_param: String,
    required_role: Option<UserRole>,
}

impl ClientRouteGuard {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            login_path: config.login_path.clone(),
            callback_param: config.callback_param.clone(),
            required_role: None,
        }
    }

    pub fn with_required_role(mut self, role: UserRole) -> Self {
        self.required_role = Some(role);
        self
    }

    pub fn evaluate(&self, view: &SessionView, current_path: &str) -> ClientGuardOutcome {
        match view.status {
            SessionStatus::Loading => ClientGuardOutcome::Loading,
            SessionStatus::Unauthenticated => ClientGuardOutcome::Redirect(login_location(
                &self.login_path,
                &self.callback_param,
                current_path,
            )),
            SessionStatus::Authenticated => match self.required_role {
                Some(required) if view.user.as_ref().map(|u| u.role) != Some(required) => {
                    ClientGuardOutcome::Unauthorized
                }
                _ => ClientGuardOutcome::Render,
            },
        }
    }
}

/// Shared session cache. Stale-time based, never refetched on focus.
/// At most one background fetch runs at a time; mounts share it.
pub struct SessionQuery<S> {
    source: Arc<S>,
    tx: watch::Sender<SessionView>,
    fetched_at: RwLock<Option<Instant>>,
    stale_time: Duration,
    in_flight: AtomicBool,
    /// Routes currently mounted on this query
    mounted: Arc<AtomicUsize>,
}

impl<S> SessionQuery<S>
where
    S: SessionSource + Send + Sync + 'static,
{
    pub fn new(source: Arc<S>, stale_time: Duration) -> Arc<Self> {
        let (tx, _rx) = watch::channel(SessionView::loading());

        Arc::new(Self {
            source,
            tx,
            fetched_at: RwLock::new(None),
            stale_time,
            in_flight: AtomicBool::new(false),
            mounted: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn from_config(source: Arc<S>, config: &AuthConfig) -> Arc<Self> {
        Self::new(source, config.session_stale_time)
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> SessionView {
        self.tx.borrow().clone()
    }

    /// True when nothing was published yet or the last publish is older than the stale time
    pub fn is_stale(&self) -> bool {
        let fetched_at = *self
            .fetched_at
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        fetched_at.is_none_or(|at| at.elapsed() >= self.stale_time)
    }

    /// One attempt against the session endpoint. Does not publish.
    pub async fn fetch(&self) -> SessionView {
        match self.source.fetch_session().await {
            Ok(user) => SessionView::from_user(user),
            Err(e) => {
                tracing::warn!(error = %e, "Session fetch failed, treating as signed out");
                SessionView::unauthenticated()
            }
        }
    }

    /// Make `view` the cached value and notify subscribers if it changed
    pub fn publish(&self, view: SessionView) {
        *self
            .fetched_at
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());

        self.tx.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }

    /// Fetch and publish
    pub async fn refresh(&self) -> SessionView {
        let view = self.fetch().await;
        self.publish(view.clone());
        view
    }

    /// Drop the cached answer, e.g. after sign-out. Subscribers see
    /// `Loading` until the next fetch resolves.
    pub fn invalidate(&self) {
        *self
            .fetched_at
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;

        self.tx.send_if_modified(|current| {
            if current.status == SessionStatus::Loading {
                false
            } else {
                *current = SessionView::loading();
                true
            }
        });
    }

    /// True while a background fetch started by a mount is pending
    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Start a background fetch unless the cache is fresh or one is already
    /// pending. The result is discarded when no route is mounted anymore.
    fn spawn_fetch_if_stale(self: &Arc<Self>, path: &str) {
        if !self.is_stale() {
            return;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(path = %path, "Joining pending session fetch");
            return;
        }

        let query = Arc::clone(self);
        let route = path.to_string();

        tokio::spawn(async move {
            let view = query.fetch().await;
            if query.mounted.load(Ordering::Acquire) > 0 {
                query.publish(view);
            } else {
                tracing::debug!(path = %route, "Discarding session fetch for unmounted route");
            }
            query.in_flight.store(false, Ordering::Release);
        });
    }
}

/// A mounted protected view
pub struct ProtectedRoute {
    guard: ClientRouteGuard,
    path: String,
    rx: watch::Receiver<SessionView>,
    mounted: Arc<AtomicUsize>,
}

impl ProtectedRoute {
    /// Subscribe to `query` and start a fetch when its cache is stale and
    /// none is pending. Must be called inside a tokio runtime.
    pub fn mount<S>(
        query: &Arc<SessionQuery<S>>,
        guard: ClientRouteGuard,
        path: impl Into<String>,
    ) -> Self
    where
        S: SessionSource + Send + Sync + 'static,
    {
        let mounted = Arc::clone(&query.mounted);
        mounted.fetch_add(1, Ordering::AcqRel);

        let rx = query.subscribe();
        let path = path.into();
        query.spawn_fetch_if_stale(&path);

        Self {
            guard,
            path,
            rx,
            mounted,
        }
    }

    /// Outcome for the current session view
    pub fn outcome(&self) -> ClientGuardOutcome {
        self.guard.evaluate(&self.rx.borrow(), &self.path)
    }

    /// Wait for the next session change and re-evaluate. `None` once the query is gone.
    pub async fn next_outcome(&mut self) -> Option<ClientGuardOutcome> {
        self.rx.changed().await.ok()?;
        Some(self.outcome())
    }

    pub fn unmount(self) {}
}

impl Drop for ProtectedRoute {
    fn drop(&mut self) {
        self.mounted.fetch_sub(1, Ordering::AcqRel);
    }
}
