//! Demo fleet loaded at startup when `SEED_MOCK_DATA` is enabled.

use chrono::{DateTime, Duration, Utc};

use crate::models::delivery::{
    Delivery, DeliveryItem, DeliveryStatus, DeliveryWindow, TemperatureSensitivity,
};
use crate::models::driver::Driver;
use crate::models::location::{GeoPoint, Location};

pub fn drivers(now: DateTime<Utc>) -> Vec<Driver> {
    vec![
        Driver {
            id: "driver1".to_string(),
            name: "John Doe".to_string(),
            phone: "+1234567890".to_string(),
            email: "john@example.com".to_string(),
            vehicle_type: "bike".to_string(),
            vehicle_number: "BIKE123".to_string(),
            rating: 4.8,
            total_deliveries: 150,
            current_location: GeoPoint::new(40.7125, -74.0055),
            updated_at: now,
        },
        Driver {
            id: "driver2".to_string(),
            name: "Jane Smith".to_string(),
            phone: "+0987654321".to_string(),
            email: "jane@example.com".to_string(),
            vehicle_type: "scooter".to_string(),
            vehicle_number: "SCOOT456".to_string(),
            rating: 4.9,
            total_deliveries: 200,
            current_location: GeoPoint::new(40.7118, -74.0048),
            updated_at: now,
        },
    ]
}

pub fn deliveries(now: DateTime<Utc>) -> Vec<Delivery> {
    vec![
        Delivery {
            id: "delivery1".to_string(),
            order_id: "order1".to_string(),
            driver_id: "driver1".to_string(),
            customer_name: "Alice Johnson".to_string(),
            customer_address: "123 Main St, City".to_string(),
            customer_phone: "+1112223333".to_string(),
            items: vec![
                item("item1", "Burger", 2, 12.99, TemperatureSensitivity::Hot, Some(45)),
                item("item2", "Fries", 1, 4.99, TemperatureSensitivity::Hot, Some(30)),
            ],
            status: DeliveryStatus::InTransit,
            pickup_location: Location::new(40.7128, -74.0060, "Restaurant A, 456 Food St"),
            delivery_location: Location::new(40.7148, -74.0080, "123 Main St, City"),
            delivery_window: window(now, 20, 15, 4),
            estimated_time: Some(now + Duration::minutes(15)),
            notes: Some("Please ring bell twice".to_string()),
        },
        Delivery {
            id: "delivery2".to_string(),
            order_id: "order2".to_string(),
            driver_id: "driver1".to_string(),
            customer_name: "Bob Wilson".to_string(),
            customer_address: "789 Oak Ave, Town".to_string(),
            customer_phone: "+4445556666".to_string(),
            items: vec![item(
                "item3",
                "Pizza",
                1,
                18.99,
                TemperatureSensitivity::Hot,
                Some(40),
            )],
            status: DeliveryStatus::Pending,
            pickup_location: Location::new(40.7138, -74.0070, "Restaurant B, 789 Pizza St"),
            delivery_location: Location::new(40.7158, -74.0090, "789 Oak Ave, Town"),
            delivery_window: window(now, 5, 30, 3),
            estimated_time: Some(now + Duration::minutes(30)),
            notes: None,
        },
        Delivery {
            id: "delivery3".to_string(),
            order_id: "order3".to_string(),
            driver_id: "driver2".to_string(),
            customer_name: "Charlie Brown".to_string(),
            customer_address: "321 Pine St, Village".to_string(),
            customer_phone: "+7778889999".to_string(),
            items: vec![item(
                "item4",
                "Sushi Combo",
                1,
                25.99,
                TemperatureSensitivity::Chilled,
                Some(60),
            )],
            status: DeliveryStatus::PickedUp,
            pickup_location: Location::new(40.7120, -74.0050, "Restaurant C, 123 Sushi St"),
            delivery_location: Location::new(40.7140, -74.0070, "321 Pine St, Village"),
            delivery_window: window(now, 10, 20, 2),
            estimated_time: Some(now + Duration::minutes(20)),
            notes: None,
        },
    ]
}

fn window(now: DateTime<Utc>, opened_ago: i64, closes_in: i64, priority: u8) -> DeliveryWindow {
    DeliveryWindow {
        start_time: now - Duration::minutes(opened_ago),
        end_time: now + Duration::minutes(closes_in),
        priority,
        late_penalty: None,
    }
}

fn item(
    id: &str,
    name: &str,
    quantity: u32,
    price: f64,
    temperature_sensitivity: TemperatureSensitivity,
    max_safe_time_minutes: Option<u32>,
) -> DeliveryItem {
    DeliveryItem {
        id: id.to_string(),
        name: name.to_string(),
        quantity,
        price,
        temperature_sensitivity,
        max_safe_time_minutes,
    }
}
