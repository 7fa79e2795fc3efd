pub mod deliveries;
pub mod drivers;
pub mod optimize;
pub mod ws;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::error::AppError;
use crate::models::delivery::DeliveryWindow;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(drivers::router())
        .merge(deliveries::router())
        .merge(optimize::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    drivers: usize,
    deliveries: usize,
    active_deliveries: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let table = state.deliveries.read().await;

    Json(HealthResponse {
        status: "ok",
        drivers: state.drivers.len(),
        deliveries: table.len(),
        active_deliveries: table.active_len(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}

pub(crate) fn validate_priority(delivery_id: &str, window: &DeliveryWindow) -> Result<(), AppError> {
    if window.has_valid_priority() {
        return Ok(());
    }

    Err(AppError::BadRequest(format!(
        "delivery {delivery_id}: priority must be between {} and {}, got {}",
        DeliveryWindow::MIN_PRIORITY,
        DeliveryWindow::MAX_PRIORITY,
        window.priority
    )))
}
