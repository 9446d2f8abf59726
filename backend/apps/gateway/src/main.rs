//! Gateway Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but request-level errors go through
//! `auth::AuthError` and `kernel::error::AppError`.

mod config;
mod routes;

use auth::{HttpCredentialBackend, InMemoryCredentialBackend};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::GatewayConfig;
use crate::routes::build_app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env()?;

    tracing::info!(
        cookie_secure = config.auth.cookie_secure,
        unmatched = ?config.auth.routes.unmatched,
        "Auth configuration loaded"
    );

    let app = match &config.auth_backend_url {
        Some(url) => {
            let backend = HttpCredentialBackend::new(url)?;
            tracing::info!(login_url = %backend.login_url(), "Using HTTP credential backend");
            build_app(backend, config.auth.clone(), &config.frontend_origins)
        }
        None => {
            tracing::warn!("AUTH_BACKEND_URL not set, using in-memory demo accounts");
            let backend = InMemoryCredentialBackend::with_demo_accounts(
                config.auth.session_secret,
                config.auth.session_max_age,
            );
            build_app(backend, config.auth.clone(), &config.frontend_origins)
        }
    };

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
