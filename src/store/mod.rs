pub mod mock;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::delivery::{Delivery, DeliveryStatus};
use crate::models::event::StatusEvent;

/// Deliveries keyed by id, with a per-driver index derived from the records.
///
/// Both maps are only touched through `&mut self`, so a single lock around
/// the table keeps them consistent.
#[derive(Debug, Default)]
pub struct DeliveryTable {
    records: HashMap<String, Delivery>,
    by_driver: HashMap<String, Vec<String>>,
}

impl DeliveryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a delivery. A replaced delivery moves to the end of
    /// its driver's list.
    pub fn insert(&mut self, delivery: Delivery) -> Option<Delivery> {
        let previous = self.records.remove(&delivery.id);
        if let Some(previous) = &previous {
            self.unindex(previous);
        }

        self.by_driver
            .entry(delivery.driver_id.clone())
            .or_default()
            .push(delivery.id.clone());
        self.records.insert(delivery.id.clone(), delivery);

        previous
    }

    pub fn get(&self, id: &str) -> Option<&Delivery> {
        self.records.get(id)
    }

    /// Deliveries assigned to the driver, in insertion order.
    pub fn for_driver(&self, driver_id: &str) -> Vec<&Delivery> {
        self.by_driver
            .get(driver_id)
            .map(|ids| ids.iter().filter_map(|id| self.records.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn active_for_driver(&self, driver_id: &str) -> Vec<Delivery> {
        self.for_driver(driver_id)
            .into_iter()
            .filter(|delivery| delivery.status.is_active())
            .cloned()
            .collect()
    }

    pub fn update_status(
        &mut self,
        id: &str,
        status: DeliveryStatus,
        now: DateTime<Utc>,
    ) -> Result<StatusEvent, AppError> {
        let delivery = self
            .records
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("delivery {id} not found")))?;

        let previous_status = delivery.status;
        if !previous_status.can_transition_to(status) {
            return Err(AppError::Conflict(format!(
                "delivery {id} cannot move from {previous_status:?} to {status:?}"
            )));
        }

        delivery.status = status;

        Ok(StatusEvent {
            delivery_id: delivery.id.clone(),
            driver_id: delivery.driver_id.clone(),
            previous_status,
            status,
            changed_at: now,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn active_len(&self) -> usize {
        self.records
            .values()
            .filter(|delivery| delivery.status.is_active())
            .count()
    }

    fn unindex(&mut self, delivery: &Delivery) {
        if let Some(ids) = self.by_driver.get_mut(&delivery.driver_id) {
            ids.retain(|id| id != &delivery.id);
            if ids.is_empty() {
                self.by_driver.remove(&delivery.driver_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::DeliveryTable;
    use crate::error::AppError;
    use crate::models::delivery::{Delivery, DeliveryStatus};
    use crate::store::mock;

    fn table() -> DeliveryTable {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let mut table = DeliveryTable::new();
        for delivery in mock::deliveries(now) {
            table.insert(delivery);
        }
        table
    }

    fn ids(deliveries: &[&Delivery]) -> Vec<String> {
        deliveries.iter().map(|d| d.id.clone()).collect()
    }

    #[test]
    fn driver_index_follows_insertion_order() {
        let table = table();

        assert_eq!(table.len(), 3);
        assert_eq!(
            ids(&table.for_driver("driver1")),
            vec!["delivery1", "delivery2"]
        );
        assert_eq!(ids(&table.for_driver("driver2")), vec!["delivery3"]);
        assert!(table.for_driver("driver9").is_empty());
    }

    #[test]
    fn reassigning_a_delivery_moves_it_between_drivers() {
        let mut table = table();
        let mut moved = table.get("delivery1").cloned().unwrap();
        moved.driver_id = "driver2".to_string();

        let previous = table.insert(moved);

        assert_eq!(previous.unwrap().driver_id, "driver1");
        assert_eq!(table.len(), 3);
        assert_eq!(ids(&table.for_driver("driver1")), vec!["delivery2"]);
        assert_eq!(
            ids(&table.for_driver("driver2")),
            vec!["delivery3", "delivery1"]
        );
    }

    #[test]
    fn status_update_is_visible_through_both_lookups() {
        let mut table = table();
        let now = Utc::now();

        let event = table
            .update_status("delivery2", DeliveryStatus::PickedUp, now)
            .unwrap();

        assert_eq!(event.previous_status, DeliveryStatus::Pending);
        assert_eq!(event.driver_id, "driver1");
        assert_eq!(table.get("delivery2").unwrap().status, DeliveryStatus::PickedUp);
        assert_eq!(
            table.for_driver("driver1")[1].status,
            DeliveryStatus::PickedUp
        );
    }

    #[test]
    fn delivered_work_drops_out_of_the_active_list() {
        let mut table = table();
        table
            .update_status("delivery1", DeliveryStatus::Delivered, Utc::now())
            .unwrap();

        let active = table.active_for_driver("driver1");

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "delivery2");
        assert_eq!(table.active_len(), 2);
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        let mut table = table();

        let backwards = table.update_status("delivery1", DeliveryStatus::Pending, Utc::now());
        assert!(matches!(backwards, Err(AppError::Conflict(_))));
        assert_eq!(table.get("delivery1").unwrap().status, DeliveryStatus::InTransit);

        let missing = table.update_status("nope", DeliveryStatus::Delivered, Utc::now());
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
