//! Subscriber that logs everything published on a [`BroadcastChannel`](super::BroadcastChannel).

use super::events::{EventMessage, Topic};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

pub struct EventConsumer {
    receiver: broadcast::Receiver<EventMessage>,
}

impl EventConsumer {
    pub fn new(receiver: broadcast::Receiver<EventMessage>) -> Self {
        Self { receiver }
    }

    /// Logs messages until the channel closes. Returns how many were handled.
    pub async fn run(mut self) -> usize {
        info!("Event consumer started");
        let mut handled = 0;
        loop {
            match self.receiver.recv().await {
                Ok(message) => {
                    handle(&message);
                    handled += 1;
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event consumer lagged, messages lost");
                }
                Err(RecvError::Closed) => break,
            }
        }
        info!(handled, "Event consumer stopped");
        handled
    }
}

fn str_field<'a>(payload: &'a serde_json::Value, name: &str) -> &'a str {
    payload.get(name).and_then(|v| v.as_str()).unwrap_or("?")
}

fn handle(message: &EventMessage) {
    let payload = &message.payload;
    match message.topic {
        Topic::OrderEvents => match message.event_type() {
            Some("ORDER_PLACED") => info!(order_id = %message.key, "New order notification"),
            Some("ORDER_STATUS_CHANGED") => info!(
                order_id = %message.key,
                status = str_field(payload, "status"),
                "Status change notification"
            ),
            other => warn!(order_id = %message.key, event_type = ?other, "Unknown order event"),
        },
        Topic::InventoryAlerts => warn!(
            item = %message.key,
            remaining = %payload.get("currentQuantity").unwrap_or(&serde_json::Value::Null),
            "LOW STOCK ALERT"
        ),
        Topic::Analytics => info!(event_type = str_field(payload, "type"), "Analytics event processed"),
    }
}
