//! Orders, their lines and the requests that create and change them.
//!
//! # Actor Framework
//! [`Order`] implements [`ActorEntity`](actor_framework::ActorEntity); its key is an
//! [`OrderId`] minted by the actor on create. See
//! [`order_actor`](crate::order_actor) for the hooks.

use crate::order_actor::OrderError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

/// Type-safe identifier for Orders.
///
/// Uses UUIDv7, so ids sort by creation time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OrderId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for OrderId {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s)
            .map(Self)
            .map_err(|e| OrderError::Validation(format!("invalid order id {s}: {e}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// A cancelled order has already returned its stock and stays cancelled.
    /// Every other move is allowed, including staying put.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        !(*self == OrderStatus::Cancelled && next != OrderStatus::Cancelled)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested line: which item, how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub item_name: String,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(item_name: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_name: item_name.into(),
            quantity,
        }
    }
}

/// A persisted line, with the unit price captured when the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub item_name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl OrderLine {
    pub fn line_item(&self) -> LineItem {
        LineItem::new(self.item_name.clone(), self.quantity)
    }

    pub fn subtotal(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl DeliveryAddress {
    pub fn validate(&self) -> Result<(), OrderError> {
        let fields = [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zipCode", &self.zip_code),
            ("country", &self.country),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(OrderError::Validation(format!(
                    "deliveryAddress.{name} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_id: String,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub items: Vec<OrderLine>,
    pub delivery_address: DeliveryAddress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// The requested lines, without prices, in order.
    pub fn line_items(&self) -> Vec<LineItem> {
        self.items.iter().map(OrderLine::line_item).collect()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Incoming order, as accepted from callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_id: String,
    pub items: Vec<LineItem>,
    pub delivery_address: DeliveryAddress,
}

impl OrderRequest {
    /// Shape checks run before any stock is looked at.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.customer_id.trim().is_empty() {
            return Err(OrderError::Validation("customerId must not be empty".into()));
        }
        if self.items.is_empty() {
            return Err(OrderError::Validation(
                "order must contain at least one item".into(),
            ));
        }
        for line in &self.items {
            if line.item_name.trim().is_empty() {
                return Err(OrderError::Validation("itemName must not be empty".into()));
            }
            if line.quantity == 0 {
                return Err(OrderError::Validation(format!(
                    "quantity for {} must be at least 1",
                    line.item_name
                )));
            }
        }
        self.delivery_address.validate()
    }
}

/// DTO for Order creation. Built by the saga once stock has been priced.
///
/// The id and timestamp are chosen by the caller, so the saga can lock the
/// order before it exists and knows exactly what was stored.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub id: OrderId,
    pub customer_id: String,
    pub items: Vec<OrderLine>,
    pub delivery_address: DeliveryAddress,
    pub placed_at: DateTime<Utc>,
}

impl OrderCreate {
    /// Mints a fresh id, stamped now.
    pub fn new(
        customer_id: impl Into<String>,
        items: Vec<OrderLine>,
        delivery_address: DeliveryAddress,
    ) -> Self {
        Self {
            id: OrderId::new(),
            customer_id: customer_id.into(),
            items,
            delivery_address,
            placed_at: Utc::now(),
        }
    }
}

/// Changes to an existing order. Absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub delivery_address: Option<DeliveryAddress>,
}

impl OrderUpdate {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            delivery_address: None,
        }
    }
}

/// What `update_order` hands back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdateOutcome {
    pub order: Order,
    pub status_changed: bool,
    pub old_status: OrderStatus,
    pub new_status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> DeliveryAddress {
        DeliveryAddress {
            street: "1 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip_code: "62701".into(),
            country: "US".into(),
        }
    }

    fn request(items: Vec<LineItem>) -> OrderRequest {
        OrderRequest {
            customer_id: "cust-1".into(),
            items,
            delivery_address: address(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request(vec![LineItem::new("Widget", 2)]).validate().is_ok());
    }

    #[test]
    fn test_request_rejects_empty_and_zero_lines() {
        assert!(matches!(
            request(vec![]).validate(),
            Err(OrderError::Validation(_))
        ));
        assert!(matches!(
            request(vec![LineItem::new("Widget", 0)]).validate(),
            Err(OrderError::Validation(_))
        ));
    }

    #[test]
    fn test_request_rejects_blank_address_field() {
        let mut req = request(vec![LineItem::new("Widget", 1)]);
        req.delivery_address.city = "  ".into();
        match req.validate() {
            Err(OrderError::Validation(msg)) => assert!(msg.contains("city")),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_cancelled_is_terminal() {
        assert!(OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_status_serializes_screaming_snake() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"OUT_FOR_DELIVERY\"");
        assert_eq!(OrderStatus::OutForDelivery.to_string(), "OUT_FOR_DELIVERY");
    }

    #[test]
    fn test_order_id_parses_its_display_form() {
        let id = OrderId::new();
        assert_eq!(id.to_string().parse::<OrderId>().unwrap(), id);
        assert!("not-a-uuid".parse::<OrderId>().is_err());
    }
}
