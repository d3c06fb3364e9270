//! [`ActorEntity`] implementation for [`Order`].
//!
//! Orders keep the [`OrderId`] and placement time chosen by the caller. The
//! total is the sum of the line subtotals at the captured unit prices.

use super::error::OrderError;
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, OrderUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = OrderError;

    fn assign_id(_seq: u32, params: &OrderCreate) -> OrderId {
        params.id
    }

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if params.items.is_empty() {
            return Err(OrderError::Validation(
                "order must contain at least one item".into(),
            ));
        }
        let total_amount = params.items.iter().map(|line| line.subtotal()).sum();
        Ok(Self {
            id,
            customer_id: params.customer_id,
            status: OrderStatus::Pending,
            total_amount,
            items: params.items,
            delivery_address: params.delivery_address,
            created_at: params.placed_at,
            updated_at: params.placed_at,
        })
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &()) -> Result<(), OrderError> {
        if let Some(next) = update.status {
            if !self.status.can_transition_to(next) {
                return Err(OrderError::InvalidTransition {
                    from: self.status,
                    to: next,
                });
            }
            self.status = next;
        }
        if let Some(address) = update.delivery_address {
            self.delivery_address = address;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), OrderError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeliveryAddress, OrderLine};

    fn create() -> OrderCreate {
        OrderCreate::new(
            "cust-1",
            vec![
                OrderLine {
                    item_name: "Widget".into(),
                    quantity: 3,
                    unit_price: 2.5,
                },
                OrderLine {
                    item_name: "Gadget".into(),
                    quantity: 1,
                    unit_price: 10.0,
                },
            ],
            DeliveryAddress {
                street: "1 Main St".into(),
                city: "Springfield".into(),
                state: "IL".into(),
                zip_code: "62701".into(),
                country: "US".into(),
            },
        )
    }

    #[test]
    fn test_new_order_is_pending_with_line_total() {
        let params = create();
        assert_eq!(Order::assign_id(7, &params), params.id);

        let placed_at = params.placed_at;
        let order = Order::from_create_params(params.id, params).unwrap();
        assert_eq!(order.created_at, placed_at);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, 17.5);
        assert_eq!(order.item_count(), 2);
    }

    #[tokio::test]
    async fn test_cannot_leave_cancelled() {
        let mut order = Order::from_create_params(OrderId::new(), create()).unwrap();
        order
            .on_update(OrderUpdate::status(OrderStatus::Cancelled), &())
            .await
            .unwrap();

        let err = order
            .on_update(OrderUpdate::status(OrderStatus::Preparing), &())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::Cancelled,
                to: OrderStatus::Preparing,
            }
        );
        assert_eq!(order.status, OrderStatus::Cancelled);
    }
}
