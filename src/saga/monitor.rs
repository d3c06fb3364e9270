//! Low-stock detection, both per deduction and as a full sweep.

use crate::clients::{ActorClient, InventoryClient};
use crate::inventory_actor::InventoryError;
use crate::model::{InventoryItem, InventorySummary};
use crate::notify::NotificationPublisher;
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct LowStockMonitor {
    inventory: InventoryClient,
    publisher: NotificationPublisher,
}

impl LowStockMonitor {
    pub fn new(inventory: InventoryClient, publisher: NotificationPublisher) -> Self {
        Self {
            inventory,
            publisher,
        }
    }

    /// Emits a `LowStockAlert` for `item`. Never waits on the channel.
    pub fn alert(&self, item: &InventoryItem) {
        warn!(
            item = %item.item_name,
            quantity = item.quantity,
            threshold = item.threshold,
            "Low stock"
        );
        self.publisher.low_stock(item);
    }

    /// Every item at or below its threshold, by name. Alerts for each one.
    #[instrument(skip(self))]
    pub async fn scan_all(&self) -> Result<Vec<InventoryItem>, InventoryError> {
        let mut low: Vec<_> = self
            .inventory
            .list()
            .await?
            .into_iter()
            .filter(InventoryItem::is_low_stock)
            .collect();
        low.sort_by(|a, b| a.item_name.cmp(&b.item_name));

        for item in &low {
            self.alert(item);
        }
        info!(low_stock = low.len(), "Low-stock sweep done");
        Ok(low)
    }

    pub async fn summary(&self) -> Result<InventorySummary, InventoryError> {
        let items = self.inventory.list().await?;
        Ok(InventorySummary::from_items(&items))
    }
}
