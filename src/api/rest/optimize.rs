use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::routing::post;
use axum::Json;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::rest::validate_priority;
use crate::engine::ranking::rank_with_scores;
use crate::error::AppError;
use crate::models::delivery::Delivery;
use crate::models::location::GeoPoint;
use crate::models::ranking::RankedDelivery;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/optimize", post(optimize))
}

/// Ranks a caller supplied list without touching the store.
#[derive(Deserialize)]
pub struct OptimizeRequest {
    pub current_location: GeoPoint,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    pub deliveries: Vec<Delivery>,
}

#[derive(Serialize)]
pub struct OptimizeResponse {
    pub optimized_delivery_ids: Vec<String>,
    pub scores: Vec<RankedDelivery>,
}

async fn optimize(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    for delivery in &payload.deliveries {
        validate_priority(&delivery.id, &delivery.delivery_window)?;
    }

    let now = payload.now.unwrap_or_else(Utc::now);

    let start = Instant::now();
    let scores = rank_with_scores(&payload.deliveries, &payload.current_location, now);
    state
        .metrics
        .observe_optimization("adhoc", start.elapsed().as_secs_f64());

    info!(deliveries = scores.len(), "ad-hoc route optimized");

    Ok(Json(OptimizeResponse {
        optimized_delivery_ids: scores.iter().map(|r| r.delivery_id.clone()).collect(),
        scores,
    }))
}
