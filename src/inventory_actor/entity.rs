//! [`ActorEntity`] implementation for [`InventoryItem`].
//!
//! The item name is the key, so a second create with the same name is
//! rejected by the actor before this code runs.

use super::actions::{InventoryAction, InventoryActionResult, StockChange};
use super::error::InventoryError;
use crate::model::{InventoryItem, InventoryItemCreate, InventoryItemUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

fn validate_price(price: f64) -> Result<(), InventoryError> {
    if !price.is_finite() || price < 0.0 {
        return Err(InventoryError::InvalidItem(format!(
            "price must be a non-negative number, got {price}"
        )));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for InventoryItem {
    type Id = String;
    type Create = InventoryItemCreate;
    type Update = InventoryItemUpdate;
    type Action = InventoryAction;
    type ActionResult = InventoryActionResult;
    type Context = ();
    type Error = InventoryError;

    fn assign_id(_seq: u32, params: &InventoryItemCreate) -> String {
        params.item_name.clone()
    }

    fn from_create_params(id: String, params: InventoryItemCreate) -> Result<Self, InventoryError> {
        for (field, value) in [
            ("itemName", &id),
            ("unit", &params.unit),
            ("category", &params.category),
        ] {
            if value.trim().is_empty() {
                return Err(InventoryError::InvalidItem(format!("{field} must not be empty")));
            }
        }
        validate_price(params.price)?;

        let now = Utc::now();
        Ok(Self {
            item_name: id,
            quantity: params.quantity,
            threshold: params.threshold,
            unit: params.unit,
            price: params.price,
            category: params.category,
            created_at: now,
            updated_at: now,
        })
    }

    /// # Fields Updated
    /// - `quantity`, `threshold`, `price` when present
    async fn on_update(&mut self, update: InventoryItemUpdate, _ctx: &()) -> Result<(), InventoryError> {
        if let Some(price) = update.price {
            validate_price(price)?;
            self.price = price;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(threshold) = update.threshold {
            self.threshold = threshold;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: InventoryAction,
        _ctx: &(),
    ) -> Result<InventoryActionResult, InventoryError> {
        match action {
            InventoryAction::CheckStock => Ok(InventoryActionResult::CheckStock(self.quantity)),
            InventoryAction::Deduct(requested) => {
                let before = self.quantity;
                let after = before
                    .checked_sub(requested)
                    .ok_or_else(|| InventoryError::InsufficientStock {
                        item: self.item_name.clone(),
                        requested,
                        available: before,
                    })?;
                self.quantity = after;
                self.updated_at = Utc::now();
                Ok(InventoryActionResult::Deduct(StockChange {
                    before,
                    after,
                    item: self.clone(),
                }))
            }
            InventoryAction::Restore(added) => {
                let before = self.quantity;
                let after = before
                    .checked_add(added)
                    .ok_or_else(|| InventoryError::QuantityOverflow {
                        item: self.item_name.clone(),
                        current: before,
                        added,
                    })?;
                self.quantity = after;
                self.updated_at = Utc::now();
                Ok(InventoryActionResult::Restore(StockChange {
                    before,
                    after,
                    item: self.clone(),
                }))
            }
        }
    }
}
