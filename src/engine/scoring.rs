use chrono::{DateTime, Utc};

use crate::geo::haversine_km;
use crate::models::delivery::{Delivery, DeliveryWindow, TemperatureSensitivity};
use crate::models::location::GeoPoint;
use crate::models::ranking::ScoreBreakdown;

const PRIORITY_FACTOR: f64 = 2.0;
const URGENCY_BAND_MINUTES: f64 = 30.0;
const URGENCY_BAND_BOOST: f64 = 1.5;
const LATE_URGENCY_BOOST: f64 = 2.0;

const SPOILAGE_MARGIN_MINUTES: f64 = 10.0;
const SPOILAGE_BOOST: f64 = 1.5;

const URGENCY_WEIGHT: f64 = 2.0;
const TEMPERATURE_WEIGHT: f64 = 1.5;
const LATE_ROUTE_PENALTY: f64 = 0.8;

pub fn compute_score(
    delivery: &Delivery,
    current_location: &GeoPoint,
    now: DateTime<Utc>,
) -> (f64, ScoreBreakdown) {
    let pickup = &delivery.pickup_location.point;
    let dropoff = &delivery.delivery_location.point;
    let distance_km = haversine_km(current_location, pickup) + haversine_km(pickup, dropoff);

    let breakdown = ScoreBreakdown {
        urgency: urgency(&delivery.delivery_window, now),
        temperature_risk: temperature_risk(delivery, now),
        distance_km,
    };

    let mut score = weighted_score(&breakdown);
    if delivery.delivery_window.is_late(now) {
        score *= LATE_ROUTE_PENALTY;
    }

    (score, breakdown)
}

pub fn route_score(delivery: &Delivery, current_location: &GeoPoint, now: DateTime<Utc>) -> f64 {
    compute_score(delivery, current_location, now).0
}

/// The `+ 1` keeps the denominator positive when the driver is standing on
/// a zero-length route.
pub fn weighted_score(breakdown: &ScoreBreakdown) -> f64 {
    (breakdown.urgency * URGENCY_WEIGHT + breakdown.temperature_risk * TEMPERATURE_WEIGHT)
        / (breakdown.distance_km + 1.0)
}

pub fn urgency(window: &DeliveryWindow, now: DateTime<Utc>) -> f64 {
    let remaining_minutes = minutes_between(now, window.end_time);
    let mut score = f64::from(window.priority) * PRIORITY_FACTOR;

    if remaining_minutes < URGENCY_BAND_MINUTES {
        score *= URGENCY_BAND_BOOST;
    }

    // Applies on top of the band boost.
    if window.is_late(now) {
        score *= LATE_URGENCY_BOOST;
    }

    score
}

/// Items are walked in the order given. When an item is close to its safe
/// holding limit the boost multiplies the running total, not just that
/// item's share, so reordering items changes the result.
pub fn temperature_risk(delivery: &Delivery, now: DateTime<Utc>) -> f64 {
    let elapsed_minutes = minutes_between(delivery.delivery_window.start_time, now);

    delivery.items.iter().fold(0.0, |mut risk, item| {
        risk += sensitivity_risk(item.temperature_sensitivity);

        if let Some(max_safe) = item.max_safe_time_minutes {
            let time_remaining = f64::from(max_safe) - elapsed_minutes;
            if time_remaining < SPOILAGE_MARGIN_MINUTES {
                risk *= SPOILAGE_BOOST;
            }
        }

        risk
    })
}

fn sensitivity_risk(sensitivity: TemperatureSensitivity) -> f64 {
    match sensitivity {
        TemperatureSensitivity::Frozen => 3.0,
        TemperatureSensitivity::Hot => 2.0,
        TemperatureSensitivity::Chilled => 1.5,
        TemperatureSensitivity::Ambient | TemperatureSensitivity::None => 0.0,
    }
}

fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}
