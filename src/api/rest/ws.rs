use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::models::event::StatusEvent;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WsQuery {
    /// Only forward events for this driver.
    pub driver_id: Option<String>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<WsQuery>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query.driver_id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, driver_id: Option<String>) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.status_events_tx.subscribe();

    info!(driver_id = ?driver_id, "websocket client connected");

    let send_task = tokio::spawn(async move {
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "websocket client lagging, events dropped");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            if !wants_event(driver_id.as_deref(), &event) {
                continue;
            }

            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize status event for ws");
                    continue;
                }
            };

            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(_msg)) = receiver.next().await {}
    });

    first_to_finish(send_task, recv_task).await;

    info!("websocket client disconnected");
}

fn wants_event(driver_filter: Option<&str>, event: &StatusEvent) -> bool {
    driver_filter.is_none_or(|wanted| wanted == event.driver_id)
}

/// Waits for either task, then aborts the other so it releases its half of
/// the socket and its broadcast subscription.
async fn first_to_finish(mut a: JoinHandle<()>, mut b: JoinHandle<()>) {
    tokio::select! {
        _ = &mut a => b.abort(),
        _ = &mut b => a.abort(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tokio::sync::oneshot;

    use super::{first_to_finish, wants_event};
    use crate::models::delivery::DeliveryStatus;
    use crate::models::event::StatusEvent;

    fn event(driver_id: &str) -> StatusEvent {
        StatusEvent {
            delivery_id: "delivery1".to_string(),
            driver_id: driver_id.to_string(),
            previous_status: DeliveryStatus::Pending,
            status: DeliveryStatus::PickedUp,
            changed_at: Utc::now(),
        }
    }

    #[test]
    fn unfiltered_client_gets_every_event() {
        assert!(wants_event(None, &event("driver1")));
        assert!(wants_event(None, &event("driver2")));
    }

    #[test]
    fn driver_filter_drops_other_drivers() {
        assert!(wants_event(Some("driver1"), &event("driver1")));
        assert!(!wants_event(Some("driver1"), &event("driver2")));
    }

    #[tokio::test]
    async fn finished_task_aborts_its_partner() {
        let (guard_tx, guard_rx) = oneshot::channel::<()>();
        let stuck = tokio::spawn(async move {
            let _guard = guard_tx;
            std::future::pending::<()>().await;
        });
        let done = tokio::spawn(async {});

        first_to_finish(stuck, done).await;

        // The sender is dropped only once the stuck task has been cancelled.
        assert!(guard_rx.await.is_err());
    }
}
