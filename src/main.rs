use std::sync::Arc;

use chrono::Utc;
use delivery_optimizer::api;
use delivery_optimizer::config::{Config, LogFormat};
use delivery_optimizer::error::AppError;
use delivery_optimizer::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    init_tracing(&config);

    let app_state = if config.seed_mock_data {
        AppState::with_mock_data(config.event_buffer_size, Utc::now())
    } else {
        AppState::new(config.event_buffer_size)
    };
    let shared_state = Arc::new(app_state);

    tracing::info!(
        drivers = shared_state.drivers.len(),
        seeded = config.seed_mock_data,
        "state initialised"
    );

    let app = api::rest::router(shared_state);

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

fn init_tracing(config: &Config) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false);

    match config.log_format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
