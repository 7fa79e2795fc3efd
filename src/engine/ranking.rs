use chrono::{DateTime, Utc};
use tracing::debug;

use crate::engine::scoring::compute_score;
use crate::models::delivery::Delivery;
use crate::models::location::GeoPoint;
use crate::models::ranking::RankedDelivery;

/// Orders deliveries by route score, highest first.
///
/// The sort is stable: deliveries with equal scores keep the order they were
/// passed in.
pub fn rank_with_scores(
    deliveries: &[Delivery],
    current_location: &GeoPoint,
    now: DateTime<Utc>,
) -> Vec<RankedDelivery> {
    let mut ranked: Vec<RankedDelivery> = deliveries
        .iter()
        .map(|delivery| {
            let (score, score_breakdown) = compute_score(delivery, current_location, now);
            RankedDelivery {
                delivery_id: delivery.id.clone(),
                score,
                score_breakdown,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    debug!(
        deliveries = ranked.len(),
        top_score = ranked.first().map(|r| r.score),
        "deliveries ranked"
    );

    ranked
}

pub fn rank(deliveries: &[Delivery], current_location: &GeoPoint, now: DateTime<Utc>) -> Vec<String> {
    rank_with_scores(deliveries, current_location, now)
        .into_iter()
        .map(|ranked| ranked.delivery_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::{rank, rank_with_scores};
    use crate::models::delivery::{
        Delivery, DeliveryItem, DeliveryStatus, DeliveryWindow, TemperatureSensitivity,
    };
    use crate::models::location::GeoPoint;

    const PICKUP: GeoPoint = GeoPoint {
        latitude: 17.4332,
        longitude: 78.4070,
    };

    // Roughly one kilometre north of the pickup.
    const ONE_KM_NORTH: GeoPoint = GeoPoint {
        latitude: 17.44219,
        longitude: 78.4070,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn delivery(
        id: &str,
        priority: u8,
        ends_in: i64,
        items: Vec<DeliveryItem>,
        dropoff: GeoPoint,
    ) -> Delivery {
        Delivery {
            id: id.to_string(),
            order_id: format!("order-{id}"),
            driver_id: "driver1".to_string(),
            customer_name: "test-customer".to_string(),
            customer_address: String::new(),
            customer_phone: String::new(),
            items,
            status: DeliveryStatus::Pending,
            pickup_location: PICKUP.into(),
            delivery_location: dropoff.into(),
            delivery_window: DeliveryWindow {
                start_time: now() - Duration::minutes(10),
                end_time: now() + Duration::minutes(ends_in),
                priority,
                late_penalty: None,
            },
            estimated_time: None,
            notes: None,
        }
    }

    fn item(sensitivity: TemperatureSensitivity, max_safe: Option<u32>) -> DeliveryItem {
        DeliveryItem {
            id: "item".to_string(),
            name: "test-item".to_string(),
            quantity: 1,
            price: 12.5,
            temperature_sensitivity: sensitivity,
            max_safe_time_minutes: max_safe,
        }
    }

    #[test]
    fn empty_input_ranks_to_empty_output() {
        assert!(rank(&[], &PICKUP, now()).is_empty());
    }

    #[test]
    fn urgent_hot_delivery_goes_first() {
        let x = delivery(
            "x",
            5,
            5,
            vec![item(TemperatureSensitivity::Hot, Some(45))],
            ONE_KM_NORTH,
        );
        let y = delivery(
            "y",
            1,
            120,
            vec![item(TemperatureSensitivity::Ambient, None)],
            ONE_KM_NORTH,
        );

        assert_eq!(rank(&[x.clone(), y.clone()], &PICKUP, now()), vec!["x", "y"]);
        assert_eq!(rank(&[y, x], &PICKUP, now()), vec!["x", "y"]);
    }

    #[test]
    fn ranking_is_a_permutation_of_the_input() {
        let deliveries: Vec<Delivery> = (0..12u8)
            .map(|i| {
                let sensitivity = match i % 4 {
                    0 => TemperatureSensitivity::Frozen,
                    1 => TemperatureSensitivity::Hot,
                    2 => TemperatureSensitivity::Chilled,
                    _ => TemperatureSensitivity::Ambient,
                };
                let dropoff = GeoPoint::new(
                    PICKUP.latitude + f64::from(i) * 0.003,
                    PICKUP.longitude - f64::from(i) * 0.002,
                );
                delivery(
                    &format!("d{i}"),
                    i % 5 + 1,
                    i64::from(i) * 15 - 40,
                    vec![item(sensitivity, Some(u32::from(i) * 5))],
                    dropoff,
                )
            })
            .collect();

        let driver = GeoPoint::new(17.40, 78.45);
        let ranked = rank(&deliveries, &driver, now());

        assert_eq!(ranked.len(), deliveries.len());
        let unique: HashSet<&String> = ranked.iter().collect();
        let expected: HashSet<&String> = deliveries.iter().map(|d| &d.id).collect();
        assert_eq!(unique, expected);
    }

    #[test]
    fn scores_are_descending() {
        let deliveries = vec![
            delivery("slow", 1, 200, Vec::new(), ONE_KM_NORTH),
            delivery("late", 3, -15, Vec::new(), ONE_KM_NORTH),
            delivery(
                "frozen",
                2,
                40,
                vec![item(TemperatureSensitivity::Frozen, None)],
                ONE_KM_NORTH,
            ),
        ];

        let ranked = rank_with_scores(&deliveries, &PICKUP, now());

        assert!(ranked.windows(2).all(|pair| pair[0].score >= pair[1].score));
        assert_eq!(ranked[0].delivery_id, "late");
        assert_eq!(ranked[2].delivery_id, "slow");
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let deliveries: Vec<Delivery> = ["first", "second", "third"]
            .iter()
            .map(|id| {
                delivery(
                    id,
                    3,
                    60,
                    vec![item(TemperatureSensitivity::Chilled, None)],
                    ONE_KM_NORTH,
                )
            })
            .collect();

        let ranked = rank_with_scores(&deliveries, &PICKUP, now());

        assert_eq!(ranked[0].score, ranked[2].score);
        let ids: Vec<&str> = ranked.iter().map(|r| r.delivery_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn ranking_does_not_touch_input() {
        let deliveries = vec![
            delivery("a", 1, 90, Vec::new(), ONE_KM_NORTH),
            delivery("b", 5, 10, Vec::new(), ONE_KM_NORTH),
        ];

        let ranked = rank(&deliveries, &PICKUP, now());

        assert_eq!(ranked, vec!["b", "a"]);
        assert_eq!(deliveries[0].id, "a");
        assert_eq!(deliveries[1].id, "b");
    }
}
