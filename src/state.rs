use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{broadcast, RwLock};

use crate::models::driver::Driver;
use crate::models::event::StatusEvent;
use crate::observability::metrics::Metrics;
use crate::store::{mock, DeliveryTable};

pub struct AppState {
    pub drivers: DashMap<String, Driver>,
    pub deliveries: RwLock<DeliveryTable>,
    pub status_events_tx: broadcast::Sender<StatusEvent>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize) -> Self {
        Self::with_data(event_buffer_size, Vec::new(), DeliveryTable::new())
    }

    /// State preloaded with the demo drivers and deliveries, windows relative
    /// to `now`.
    pub fn with_mock_data(event_buffer_size: usize, now: DateTime<Utc>) -> Self {
        let mut table = DeliveryTable::new();
        for delivery in mock::deliveries(now) {
            table.insert(delivery);
        }

        Self::with_data(event_buffer_size, mock::drivers(now), table)
    }

    fn with_data(event_buffer_size: usize, drivers: Vec<Driver>, table: DeliveryTable) -> Self {
        // broadcast::channel panics on a zero capacity.
        let (status_events_tx, _unused_rx) = broadcast::channel(event_buffer_size.max(1));
        let metrics = Metrics::new();
        metrics.active_deliveries.set(table.active_len() as i64);

        Self {
            drivers: drivers
                .into_iter()
                .map(|driver| (driver.id.clone(), driver))
                .collect(),
            deliveries: RwLock::new(table),
            status_events_tx,
            metrics,
        }
    }
}
