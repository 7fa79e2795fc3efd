use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use axum::Json;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::validate_priority;
use crate::engine::ranking::rank;
use crate::error::AppError;
use crate::models::delivery::{Delivery, DeliveryItem, DeliveryStatus, DeliveryWindow};
use crate::models::driver::Driver;
use crate::models::location::{GeoPoint, Location};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", get(list_drivers))
        .route("/drivers/:id", get(get_driver))
        .route("/drivers/:id/location", patch(update_driver_location))
        .route(
            "/drivers/:id/deliveries",
            get(list_driver_deliveries).post(create_delivery),
        )
}

#[derive(Deserialize)]
pub struct UpdateLocationRequest {
    pub location: GeoPoint,
}

/// Optional overrides for the driver's stored position and the clock.
#[derive(Debug, Default, Deserialize)]
pub struct RouteQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct CreateDeliveryRequest {
    #[serde(default)]
    pub order_id: Option<String>,
    pub customer_name: String,
    #[serde(default)]
    pub customer_address: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub items: Vec<DeliveryItem>,
    pub pickup_location: Location,
    pub delivery_location: Location,
    pub delivery_window: DeliveryWindow,
    #[serde(default)]
    pub estimated_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> Json<Vec<Driver>> {
    let mut drivers: Vec<Driver> = state
        .drivers
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    drivers.sort_by(|a, b| a.id.cmp(&b.id));

    Json(drivers)
}

async fn get_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Driver>, AppError> {
    let driver = state
        .drivers
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("driver {id} not found")))?;

    Ok(Json(driver.value().clone()))
}

async fn update_driver_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<Json<Driver>, AppError> {
    let mut driver = state
        .drivers
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("driver {id} not found")))?;

    driver.current_location = payload.location;
    driver.updated_at = Utc::now();

    Ok(Json(driver.clone()))
}

async fn list_driver_deliveries(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<Vec<Delivery>>, AppError> {
    let current_location = {
        let driver = state
            .drivers
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("driver {id} not found")))?;

        match (query.lat, query.lng) {
            (Some(lat), Some(lng)) => {
                if !lat.is_finite() || !lng.is_finite() {
                    return Err(AppError::BadRequest(
                        "lat and lng must be finite numbers".to_string(),
                    ));
                }
                GeoPoint::new(lat, lng)
            }
            (None, None) => driver.current_location,
            _ => {
                return Err(AppError::BadRequest(
                    "lat and lng must be provided together".to_string(),
                ));
            }
        }
    };
    let now = query.at.unwrap_or_else(Utc::now);

    let active = state.deliveries.read().await.active_for_driver(&id);

    let start = Instant::now();
    let ranked_ids = rank(&active, &current_location, now);
    state
        .metrics
        .observe_optimization("driver", start.elapsed().as_secs_f64());

    let mut by_id: HashMap<String, Delivery> = active
        .into_iter()
        .map(|delivery| (delivery.id.clone(), delivery))
        .collect();
    let ordered: Vec<Delivery> = ranked_ids
        .iter()
        .filter_map(|delivery_id| by_id.remove(delivery_id))
        .collect();

    info!(
        driver_id = %id,
        deliveries = ordered.len(),
        next = ordered.first().map(|d| d.id.as_str()).unwrap_or("-"),
        "driver route optimized"
    );

    Ok(Json(ordered))
}

async fn create_delivery(
    State(state): State<Arc<AppState>>,
    Path(driver_id): Path<String>,
    Json(payload): Json<CreateDeliveryRequest>,
) -> Result<Json<Delivery>, AppError> {
    if !state.drivers.contains_key(&driver_id) {
        return Err(AppError::NotFound(format!("driver {driver_id} not found")));
    }

    if payload.customer_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "customer_name cannot be empty".to_string(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    validate_priority(&id, &payload.delivery_window)?;
    if payload.delivery_window.end_time < payload.delivery_window.start_time {
        return Err(AppError::BadRequest(
            "delivery_window end_time must not precede start_time".to_string(),
        ));
    }

    let delivery = Delivery {
        id,
        order_id: payload
            .order_id
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        driver_id,
        customer_name: payload.customer_name,
        customer_address: payload.customer_address,
        customer_phone: payload.customer_phone,
        items: payload.items,
        status: DeliveryStatus::Pending,
        pickup_location: payload.pickup_location,
        delivery_location: payload.delivery_location,
        delivery_window: payload.delivery_window,
        estimated_time: payload.estimated_time,
        notes: payload.notes,
    };

    {
        let mut table = state.deliveries.write().await;
        table.insert(delivery.clone());
        state.metrics.active_deliveries.set(table.active_len() as i64);
    }

    info!(
        delivery_id = %delivery.id,
        driver_id = %delivery.driver_id,
        "delivery created"
    );

    Ok(Json(delivery))
}
