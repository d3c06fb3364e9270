//! Inventory rows, keyed by their unique item name.
//!
//! # Actor Framework
//! This struct implements the [`ActorEntity`](actor_framework::ActorEntity) trait,
//! allowing it to be managed by a [`ResourceActor`](actor_framework::ResourceActor).
//!
//! See [`impl ActorEntity for InventoryItem`](#impl-ActorEntity-for-InventoryItem) for details on:
//! - Creation parameters ([`InventoryItemCreate`](crate::model::InventoryItemCreate))
//! - Update parameters ([`InventoryItemUpdate`](crate::model::InventoryItemUpdate))
//! - Custom actions ([`InventoryAction`](crate::inventory_actor::InventoryAction))

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub item_name: String,
    pub quantity: u32,
    pub threshold: u32,
    pub unit: String,
    pub price: f64,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// At or below threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.threshold
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }
}

/// DTO for item creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemCreate {
    pub item_name: String,
    pub quantity: u32,
    pub threshold: u32,
    pub unit: String,
    pub price: f64,
    pub category: String,
}

impl InventoryItemCreate {
    pub fn new(
        item_name: impl Into<String>,
        quantity: u32,
        threshold: u32,
        unit: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            item_name: item_name.into(),
            quantity,
            threshold,
            unit: unit.into(),
            price,
            category: category.into(),
        }
    }
}

/// Administrative edit. Absent fields are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemUpdate {
    pub quantity: Option<u32>,
    pub threshold: Option<u32>,
    pub price: Option<f64>,
}

/// Stock health counters across the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_items: usize,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub healthy_stock_count: usize,
}

impl InventorySummary {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a InventoryItem>) -> Self {
        let mut summary = Self::default();
        for item in items {
            summary.total_items += 1;
            if item.is_low_stock() {
                summary.low_stock_count += 1;
            }
            if item.is_out_of_stock() {
                summary.out_of_stock_count += 1;
            }
        }
        summary.healthy_stock_count = summary.total_items - summary.low_stock_count;
        summary
    }
}
