use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::location::GeoPoint;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub vehicle_type: String,
    pub vehicle_number: String,
    pub rating: f64,
    pub total_deliveries: u32,
    pub current_location: GeoPoint,
    pub updated_at: DateTime<Utc>,
}
