use std::time::Duration;

use kiosk_server::config::{BoxError, StoreBackend};
use kiosk_server::utils::init_logger_with_file;
use kiosk_server::{AppState, Config, api};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_logger_with_file(&config.log_level, config.log_dir.as_deref());

    tracing::info!(
        environment = %config.environment,
        store = ?config.store_backend,
        timezone = %config.timezone,
        "Starting kiosk-server"
    );
    if config.store_backend == StoreBackend::Memory && !config.is_development() {
        tracing::warn!("In-memory store outside development; orders will not be persisted");
    }

    let state = AppState::new(&config).await?;

    // Drop idle per-student locks every 5 minutes
    let locks = state.locks.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            locks.prune();
        }
    });

    let app = api::build_app(state, config.request_timeout);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("kiosk-server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("kiosk-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
