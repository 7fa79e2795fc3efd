use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, patch};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::delivery::{Delivery, DeliveryStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/deliveries/:id", get(get_delivery))
        .route("/deliveries/:id/status", patch(update_delivery_status))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: DeliveryStatus,
}

async fn get_delivery(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Delivery>, AppError> {
    let table = state.deliveries.read().await;
    let delivery = table
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("delivery {id} not found")))?;

    Ok(Json(delivery.clone()))
}

async fn update_delivery_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Delivery>, AppError> {
    let mut table = state.deliveries.write().await;

    let event = match table.update_status(&id, payload.status, Utc::now()) {
        Ok(event) => event,
        Err(err) => {
            state
                .metrics
                .status_updates_total
                .with_label_values(&["rejected"])
                .inc();
            warn!(delivery_id = %id, error = %err, "status update rejected");
            return Err(err);
        }
    };

    let delivery = table
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::Internal(format!("delivery {id} vanished during update")))?;
    state.metrics.active_deliveries.set(table.active_len() as i64);
    drop(table);

    state
        .metrics
        .status_updates_total
        .with_label_values(&["success"])
        .inc();
    let _ = state.status_events_tx.send(event.clone());

    info!(
        delivery_id = %event.delivery_id,
        driver_id = %event.driver_id,
        from = ?event.previous_status,
        to = ?event.status,
        "delivery status updated"
    );

    Ok(Json(delivery))
}
