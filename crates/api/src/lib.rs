//! # Rendezvous API
//!
//! The API crate provides the web server for the appointment booking service:
//! the creation wizard, the verified edit wizard, phone search and the
//! administrative endpoints.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Extract requests and delegate to the wizard service
//! - **Service**: Wires the core state machines to storage and mail
//! - **Middleware**: Session identification and error mapping
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework. Records are stored through any
//! [`BookingStore`]; the server binary uses PostgreSQL.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Notifier that logs outgoing mail
pub mod mailer;
/// Middleware for session identification and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Wizard drafts held in memory
pub mod session;
/// The wizard service shared by all handlers
pub mod service;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, StatusCode},
};
use eyre::Result;
use rendezvous_core::{
    notification::Notifier,
    store::{BookingStore, SessionStore},
};
use rendezvous_db::{DbPool, PgStore};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::{mailer::LogMailer, service::DynWizardService, session::MemorySessionStore};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```no_run
/// use std::{sync::Arc, time::Duration};
/// use rendezvous_api::{ApiState, mailer::LogMailer, session::MemorySessionStore};
/// use rendezvous_db::MemoryStore;
///
/// let state = ApiState::new(
///     Arc::new(MemoryStore::new()),
///     Arc::new(LogMailer),
///     Arc::new(MemorySessionStore::new(Duration::from_secs(3600))),
///     "en",
/// );
/// let app = rendezvous_api::build_router(Arc::new(state));
/// ```
pub struct ApiState {
    pub service: DynWizardService,
}

impl ApiState {
    pub fn new(
        store: Arc<dyn BookingStore>,
        notifier: Arc<dyn Notifier>,
        sessions: Arc<dyn SessionStore>,
        langcode: impl Into<String>,
    ) -> Self {
        Self {
            service: DynWizardService::new(store, notifier, sessions, langcode),
        }
    }
}

/// Builds the router with every endpoint attached to `state`.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Appointment creation wizard
        .merge(routes::wizard::routes())
        // Search, cancellation and the edit wizard
        .merge(routes::bookings::routes())
        // Administration
        .merge(routes::admin::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// Installs logging, wires the PostgreSQL store, the in-memory session store
/// and the log mailer into the wizard service, and serves until the listener
/// fails.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = rendezvous_api::config::ApiConfig::from_env()?;
/// let db_pool = rendezvous_db::create_pool(&config.database_url).await?;
/// rendezvous_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let sessions = Arc::new(MemorySessionStore::new(config.session_ttl));
    spawn_session_purge(Arc::clone(&sessions));

    let state = Arc::new(ApiState::new(
        Arc::new(PgStore::new(db_pool)),
        Arc::new(LogMailer),
        sessions,
        config.default_langcode.clone(),
    ));

    let app = build_router(state).layer(TraceLayer::new_for_http());

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let mut allowed: Vec<HeaderValue> = Vec::with_capacity(origins.len());
        for origin in origins {
            match origin.parse() {
                Ok(value) => allowed.push(value),
                Err(_) => warn!("Ignoring invalid CORS origin {}", origin),
            }
        }

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
                axum::http::HeaderName::from_static(middleware::session::SESSION_HEADER),
            ])
            .allow_origin(allowed)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|_: BoxError| async {
                StatusCode::REQUEST_TIMEOUT
            }))
            .timeout(Duration::from_secs(config.request_timeout))
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn spawn_session_purge(sessions: Arc<MemorySessionStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            sessions.purge_expired().await;
        }
    });
}
