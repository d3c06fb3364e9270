//! Event payloads and the envelope every message travels in.

use super::channel::ChannelError;
use crate::model::{InventoryItem, Order, OrderId, OrderLine, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub const ORDER_SOURCE: &str = "order-service";
pub const INVENTORY_SOURCE: &str = "inventory-service";
pub const ANALYTICS_SOURCE: &str = "order-management-system";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "order-events")]
    OrderEvents,
    #[serde(rename = "inventory-alerts")]
    InventoryAlerts,
    #[serde(rename = "analytics-events")]
    Analytics,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::OrderEvents => "order-events",
            Topic::InventoryAlerts => "inventory-alerts",
            Topic::Analytics => "analytics-events",
        }
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventKind {
    OrderPlaced,
    OrderStatusChanged,
}

/// Published on `order-events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvent {
    #[serde(rename = "type")]
    pub kind: OrderEventKind,
    pub order_id: OrderId,
    pub customer_id: String,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub items: Vec<OrderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_status: Option<OrderStatus>,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl OrderEvent {
    pub fn placed(order: &Order) -> Self {
        Self::from_order(OrderEventKind::OrderPlaced, order, None)
    }

    pub fn status_changed(order: &Order, old: OrderStatus, new: OrderStatus) -> Self {
        Self::from_order(OrderEventKind::OrderStatusChanged, order, Some((old, new)))
    }

    fn from_order(kind: OrderEventKind, order: &Order, change: Option<(OrderStatus, OrderStatus)>) -> Self {
        Self {
            kind,
            order_id: order.id,
            customer_id: order.customer_id.clone(),
            status: order.status,
            total_amount: order.total_amount,
            items: order.items.clone(),
            old_status: change.map(|(old, _)| old),
            new_status: change.map(|(_, new)| new),
            timestamp: Utc::now(),
            source: ORDER_SOURCE.to_string(),
        }
    }
}

/// Published on `inventory-alerts` when an item is at or below its threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockAlert {
    pub item_name: String,
    pub current_quantity: u32,
    pub threshold: u32,
    pub category: String,
    pub alert_level: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl From<&InventoryItem> for LowStockAlert {
    fn from(item: &InventoryItem) -> Self {
        Self {
            item_name: item.item_name.clone(),
            current_quantity: item.quantity,
            threshold: item.threshold,
            category: item.category.clone(),
            alert_level: "LOW_STOCK".to_string(),
            timestamp: Utc::now(),
            source: INVENTORY_SOURCE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalyticsKind {
    NewOrder,
    OrderStatusChange,
}

impl AnalyticsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsKind::NewOrder => "NEW_ORDER",
            AnalyticsKind::OrderStatusChange => "ORDER_STATUS_CHANGE",
        }
    }
}

/// Published on `analytics-events`: `{type, data, timestamp}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    #[serde(rename = "type")]
    pub kind: AnalyticsKind,
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderData {
    pub order_id: OrderId,
    pub customer_id: String,
    pub order_value: f64,
    pub item_count: usize,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeData {
    pub order_id: OrderId,
    pub old_status: OrderStatus,
    pub new_status: OrderStatus,
    pub customer_id: String,
    pub order_value: f64,
}

impl AnalyticsEvent {
    fn new(kind: AnalyticsKind, data: impl Serialize) -> Result<Self, ChannelError> {
        Ok(Self {
            kind,
            data: serde_json::to_value(data)?,
            timestamp: Utc::now(),
            source: ANALYTICS_SOURCE.to_string(),
        })
    }

    pub fn new_order(order: &Order) -> Result<Self, ChannelError> {
        Self::new(
            AnalyticsKind::NewOrder,
            NewOrderData {
                order_id: order.id,
                customer_id: order.customer_id.clone(),
                order_value: order.total_amount,
                item_count: order.item_count(),
                category: "order_placement".to_string(),
            },
        )
    }

    pub fn status_change(order: &Order, old: OrderStatus, new: OrderStatus) -> Result<Self, ChannelError> {
        Self::new(
            AnalyticsKind::OrderStatusChange,
            StatusChangeData {
                order_id: order.id,
                old_status: old,
                new_status: new,
                customer_id: order.customer_id.clone(),
                order_value: order.total_amount,
            },
        )
    }
}

/// What actually goes over an [`EventChannel`](super::EventChannel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    pub topic: Topic,
    pub key: String,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl EventMessage {
    pub fn new(
        topic: Topic,
        key: impl Into<String>,
        source: &str,
        event: &impl Serialize,
    ) -> Result<Self, ChannelError> {
        Ok(Self {
            topic,
            key: key.into(),
            payload: serde_json::to_value(event)?,
            timestamp: Utc::now(),
            source: source.to_string(),
        })
    }

    /// The `type` field of the payload, if it has one.
    pub fn event_type(&self) -> Option<&str> {
        self.payload.get("type").and_then(serde_json::Value::as_str)
    }
}
