pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod state;

use crate::config::Config;
use crate::domain::models::user::{NewUser, Permission};
use crate::error::{AppError, ErrorKind};
use crate::infra::factory::{bootstrap_state, is_postgres_url};
use crate::state::AppState;
use api::router::create_router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_DIR: &str = "./logs";

/// Pretty stdout honouring `RUST_LOG`, plus a daily JSON file with this crate at debug.
pub fn init_logging() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(LOG_DIR, "setlist-backend.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new(format!("info,{}=debug", env!("CARGO_CRATE_NAME"))));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .pretty()
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guard
}

/// Creates the configured admin account unless a user with that email exists.
/// Returns whether an account was created.
pub async fn seed_admin(state: &AppState) -> Result<bool, AppError> {
    let (Some(email), Some(password)) = (&state.config.admin_email, &state.config.admin_password) else {
        return Ok(false);
    };

    match state.user_service.fetch_by_email(email).await {
        Ok(_) => return Ok(false),
        Err(e) if e.kind() == ErrorKind::RecordNotFound => {}
        Err(e) => return Err(e),
    }

    let admin = state.user_service.store(&NewUser {
        email: email.clone(),
        password: password.clone(),
        first_name: "Admin".to_string(),
        last_name: String::new(),
        permission: Permission::Admin,
        profile_color: String::new(),
    }).await?;

    info!("Seeded admin user {} <{}>", admin.id, admin.email);
    Ok(true)
}

pub fn listen_addr(config: &Config) -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], config.port))
}

fn backend_name(database_url: &str) -> &'static str {
    if is_postgres_url(database_url) { "postgres" } else { "sqlite" }
}

pub async fn run() {
    let _guard = init_logging();
    info!("Writing JSON logs to {}", LOG_DIR);

    let config = Config::from_env();
    let state = bootstrap_state(&config).await;

    if let Err(e) = seed_admin(&state).await {
        warn!("Could not seed admin user: {}", e);
    }

    match &config.cors_allowed_origin {
        Some(origin) => info!("CORS restricted to {}", origin),
        None => warn!("CORS_ALLOWED_ORIGIN unset, accepting any origin"),
    }

    let app = create_router(Arc::new(state));
    let addr = listen_addr(&config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    info!(backend = backend_name(&config.database_url), "Setlist backend listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, draining connections"),
        _ = terminate => info!("Received SIGTERM, draining connections"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_follows_url_scheme() {
        assert_eq!(backend_name("postgres://app@db/setlists"), "postgres");
        assert_eq!(backend_name("postgresql://app@db/setlists"), "postgres");
        assert_eq!(backend_name("sqlite://setlists.db?mode=rwc"), "sqlite");
        assert_eq!(backend_name("setlists.db"), "sqlite");
    }
}
