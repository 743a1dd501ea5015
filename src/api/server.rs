//! HTTP API server

use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::{CookieSettings, CredentialStore, SessionRegistry};
use crate::config::Config;
use crate::error::Result;

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub credentials: Arc<CredentialStore>,
    pub sessions: SessionRegistry,
    pub cookies: CookieSettings,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(credentials: CredentialStore, sessions: SessionRegistry, cookies: CookieSettings) -> Self {
        Self {
            credentials: Arc::new(credentials),
            sessions,
            cookies,
        }
    }

    /// Build state from configuration. Hashes any plaintext passwords, so
    /// this blocks for a moment per account.
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = CredentialStore::from_config(config)?;
        Ok(Self::new(
            credentials,
            SessionRegistry::new(),
            CookieSettings::from(&config.session),
        ))
    }
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);

    if let Some(secs) = config.session.sweep_interval_secs.filter(|s| *s > 0) {
        start_session_sweeper(state.sessions.clone(), Duration::from_secs(secs));
    }

    if !state.cookies.secure {
        tracing::warn!("Session cookies are not marked Secure; only use this behind plain HTTP for testing");
    }

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    serve(listener, state, config.server.static_dir.as_deref()).await
}

/// Serve the API on an already bound listener
pub async fn serve(listener: TcpListener, state: SharedState, static_dir: Option<&Path>) -> Result<()> {
    let app = create_router(state, static_dir);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/me", get(routes::whoami))
        .route("/api/login", post(routes::login))
        .route("/api/logout", post(routes::logout));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Periodically drop expired sessions. Lookups still expire lazily; this only
/// bounds memory held by sessions nobody comes back for.
pub fn start_session_sweeper(sessions: SessionRegistry, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let removed = sessions.sweep_expired().await;
            if removed > 0 {
                tracing::debug!("Swept {} expired session(s)", removed);
            }
        }
    });

    tracing::info!("Session sweeper started ({:?} interval)", interval);
}
