use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::delivery::DeliveryStatus;

/// Published on the status channel after every accepted status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEvent {
    pub delivery_id: String,
    pub driver_id: String,
    pub previous_status: DeliveryStatus,
    pub status: DeliveryStatus,
    pub changed_at: DateTime<Utc>,
}
