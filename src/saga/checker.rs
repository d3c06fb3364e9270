//! Read-only pre-flight check of requested quantities.

use crate::clients::{ActorClient, InventoryClient};
use crate::inventory_actor::InventoryError;
use crate::model::{LineItem, OrderLine};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq)]
pub enum Availability {
    /// Every line can be served. Lines carry the unit price read during the check.
    Available { lines: Vec<OrderLine> },
    /// The first line that cannot be served. `available` is `None` when the
    /// item does not exist.
    Unavailable {
        item_name: String,
        requested: u32,
        available: Option<u32>,
    },
}

/// Compares each requested line against a snapshot of current stock.
///
/// Advisory only: nothing is locked between this read and the deduction that
/// follows, so a concurrent order can still take the stock. The ledger
/// re-checks inside the inventory actor.
#[derive(Clone)]
pub struct AvailabilityChecker {
    inventory: InventoryClient,
}

impl AvailabilityChecker {
    pub fn new(inventory: InventoryClient) -> Self {
        Self { inventory }
    }

    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn check(&self, lines: &[LineItem]) -> Result<Availability, InventoryError> {
        let mut priced = Vec::with_capacity(lines.len());
        for line in lines {
            match self.inventory.get(line.item_name.clone()).await? {
                None => {
                    debug!(item = %line.item_name, "Item missing");
                    return Ok(Availability::Unavailable {
                        item_name: line.item_name.clone(),
                        requested: line.quantity,
                        available: None,
                    });
                }
                Some(item) if item.quantity < line.quantity => {
                    debug!(item = %line.item_name, available = item.quantity, "Short");
                    return Ok(Availability::Unavailable {
                        item_name: line.item_name.clone(),
                        requested: line.quantity,
                        available: Some(item.quantity),
                    });
                }
                Some(item) => priced.push(OrderLine {
                    item_name: line.item_name.clone(),
                    quantity: line.quantity,
                    unit_price: item.price,
                }),
            }
        }
        Ok(Availability::Available { lines: priced })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory_actor;
    use crate::model::InventoryItemCreate;

    async fn checker_with(items: &[(&str, u32)]) -> AvailabilityChecker {
        let (actor, client) = inventory_actor::new(16);
        tokio::spawn(actor.run(()));
        let inventory = InventoryClient::new(client);
        for (name, quantity) in items {
            inventory
                .create_item(InventoryItemCreate::new(*name, *quantity, 0, "pcs", 2.0, "parts"))
                .await
                .unwrap();
        }
        AvailabilityChecker::new(inventory)
    }

    #[tokio::test]
    async fn test_all_lines_available_are_priced() {
        let checker = checker_with(&[("Widget", 5), ("Gadget", 1)]).await;
        let result = checker
            .check(&[LineItem::new("Widget", 5), LineItem::new("Gadget", 1)])
            .await
            .unwrap();
        match result {
            Availability::Available { lines } => {
                assert_eq!(lines.len(), 2);
                assert!(lines.iter().all(|l| l.unit_price == 2.0));
            }
            other => panic!("Expected Available, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_first_failing_line_is_reported() {
        let checker = checker_with(&[("Widget", 1), ("Gadget", 0)]).await;
        let result = checker
            .check(&[LineItem::new("Widget", 2), LineItem::new("Gadget", 1)])
            .await
            .unwrap();
        assert_eq!(
            result,
            Availability::Unavailable {
                item_name: "Widget".into(),
                requested: 2,
                available: Some(1),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_item_has_no_available_quantity() {
        let checker = checker_with(&[]).await;
        let result = checker.check(&[LineItem::new("Ghost", 1)]).await.unwrap();
        assert!(matches!(
            result,
            Availability::Unavailable { available: None, .. }
        ));
    }
}
