//! Best-effort, non-blocking event emission.

use super::channel::{ChannelError, EventChannel};
use super::events::{
    AnalyticsEvent, EventMessage, LowStockAlert, OrderEvent, Topic, ANALYTICS_SOURCE,
    INVENTORY_SOURCE, ORDER_SOURCE,
};
use crate::model::{InventoryItem, Order, OrderStatus};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Hands events to an [`EventChannel`] without ever making the caller wait
/// on, or fail because of, the channel.
///
/// Each `emit` spawns its own send task bounded by `timeout`. Failures and
/// timeouts are logged at error level and dropped.
#[derive(Clone)]
pub struct NotificationPublisher {
    channel: Arc<dyn EventChannel>,
    timeout: Duration,
}

impl NotificationPublisher {
    pub fn new(channel: Arc<dyn EventChannel>, timeout: Duration) -> Self {
        Self { channel, timeout }
    }

    /// Serializes `event` and sends it in the background.
    pub fn emit(&self, topic: Topic, key: impl Into<String>, source: &str, event: &impl Serialize) {
        let key = key.into();
        match EventMessage::new(topic, key.clone(), source, event) {
            Ok(message) => self.dispatch(message),
            Err(e) => error!(%topic, %key, error = %e, "Dropping event"),
        }
    }

    fn dispatch(&self, message: EventMessage) {
        let channel = Arc::clone(&self.channel);
        let timeout = self.timeout;
        tokio::spawn(async move {
            let topic = message.topic;
            let key = message.key.clone();
            match tokio::time::timeout(timeout, channel.send(message)).await {
                Ok(Ok(())) => debug!(%topic, %key, "Event sent"),
                Ok(Err(e)) => error!(%topic, %key, error = %e, "Failed to send event"),
                Err(_) => error!(%topic, %key, ?timeout, "Timed out sending event"),
            }
        });
    }

    fn emit_analytics(&self, event: Result<AnalyticsEvent, ChannelError>) {
        match event {
            Ok(event) => self.emit(Topic::Analytics, event.kind.as_str(), ANALYTICS_SOURCE, &event),
            Err(e) => error!(error = %e, "Dropping analytics event"),
        }
    }

    /// `ORDER_PLACED` plus a `NEW_ORDER` analytics event.
    pub fn order_placed(&self, order: &Order) {
        self.emit(
            Topic::OrderEvents,
            order.id.to_string(),
            ORDER_SOURCE,
            &OrderEvent::placed(order),
        );
        self.emit_analytics(AnalyticsEvent::new_order(order));
    }

    /// `ORDER_STATUS_CHANGED` plus an `ORDER_STATUS_CHANGE` analytics event.
    pub fn status_changed(&self, order: &Order, old: OrderStatus, new: OrderStatus) {
        self.emit(
            Topic::OrderEvents,
            order.id.to_string(),
            ORDER_SOURCE,
            &OrderEvent::status_changed(order, old, new),
        );
        self.emit_analytics(AnalyticsEvent::status_change(order, old, new));
    }

    pub fn low_stock(&self, item: &InventoryItem) {
        self.emit(
            Topic::InventoryAlerts,
            item.item_name.clone(),
            INVENTORY_SOURCE,
            &LowStockAlert::from(item),
        );
    }
}
