use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::location::Location;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TemperatureSensitivity {
    #[default]
    None,
    Ambient,
    Chilled,
    Frozen,
    Hot,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeliveryStatus {
    #[default]
    Pending,
    PickedUp,
    InTransit,
    Delivered,
    Cancelled,
}

impl DeliveryStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Cancelled)
    }

    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }

    fn stage(self) -> u8 {
        match self {
            DeliveryStatus::Pending => 0,
            DeliveryStatus::PickedUp => 1,
            DeliveryStatus::InTransit => 2,
            DeliveryStatus::Delivered => 3,
            DeliveryStatus::Cancelled => 4,
        }
    }

    /// Statuses only move forward. Any open delivery can be cancelled,
    /// nothing leaves `Delivered` or `Cancelled`.
    pub fn can_transition_to(self, next: DeliveryStatus) -> bool {
        if self.is_terminal() || self == next {
            return false;
        }

        match next {
            DeliveryStatus::Cancelled => true,
            _ => next.stage() > self.stage(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub temperature_sensitivity: TemperatureSensitivity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_safe_time_minutes: Option<u32>,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryWindow {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// 1 (lowest) to 5 (highest).
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_penalty: Option<f64>,
}

impl DeliveryWindow {
    pub const MIN_PRIORITY: u8 = 1;
    pub const MAX_PRIORITY: u8 = 5;

    pub fn is_late(&self, now: DateTime<Utc>) -> bool {
        now > self.end_time
    }

    pub fn has_valid_priority(&self) -> bool {
        (Self::MIN_PRIORITY..=Self::MAX_PRIORITY).contains(&self.priority)
    }
}

/// Everything outside the routing fields is defaulted so ad-hoc
/// optimization requests can post bare route stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub id: String,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub driver_id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_address: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub items: Vec<DeliveryItem>,
    #[serde(default)]
    pub status: DeliveryStatus,
    pub pickup_location: Location,
    pub delivery_location: Location,
    pub delivery_window: DeliveryWindow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
