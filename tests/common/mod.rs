#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use stock_saga::clients::InventoryClient;
use stock_saga::lifecycle::{OrderSystem, SystemConfig};
use stock_saga::model::{DeliveryAddress, InventoryItemCreate, LineItem, OrderRequest};
use stock_saga::notify::{EventChannel, InMemoryChannel};

pub fn address() -> DeliveryAddress {
    DeliveryAddress {
        street: "1 Main St".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        zip_code: "62701".into(),
        country: "US".into(),
    }
}

pub fn request(lines: &[(&str, u32)]) -> OrderRequest {
    OrderRequest {
        customer_id: "cust-1".into(),
        items: lines
            .iter()
            .map(|(name, quantity)| LineItem::new(*name, *quantity))
            .collect(),
        delivery_address: address(),
    }
}

pub fn config() -> SystemConfig {
    SystemConfig {
        notification_timeout: Duration::from_millis(200),
        ..SystemConfig::default()
    }
}

/// `(name, quantity, threshold)`; price 2.0 each.
pub async fn stock(inventory: &InventoryClient, items: &[(&str, u32, u32)]) {
    for (name, quantity, threshold) in items {
        inventory
            .create_item(InventoryItemCreate::new(*name, *quantity, *threshold, "pcs", 2.0, "parts"))
            .await
            .unwrap();
    }
}

pub async fn system_with(
    items: &[(&str, u32, u32)],
    channel: Arc<dyn EventChannel>,
) -> OrderSystem {
    let system = OrderSystem::new(&config(), channel);
    stock(&system.inventory, items).await;
    system
}

pub async fn system(items: &[(&str, u32, u32)]) -> (OrderSystem, Arc<InMemoryChannel>) {
    let channel = Arc::new(InMemoryChannel::new());
    (system_with(items, channel.clone()).await, channel)
}

pub async fn quantity(system: &OrderSystem, name: &str) -> u32 {
    system.inventory.check_stock(name).await.unwrap()
}
