//! Demo: stocks a small catalog, places one order that fits and one that does
//! not, cancels the first, then sweeps for low stock.

use stock_saga::lifecycle::{setup_tracing, OrderSystem, SystemConfig};
use stock_saga::model::{
    DeliveryAddress, InventoryItemCreate, LineItem, OrderRequest, OrderStatus, OrderUpdate,
};
use stock_saga::notify::{BroadcastChannel, EventConsumer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = SystemConfig::from_env()?;
    info!(?config, "Starting order system");

    let channel = BroadcastChannel::new(config.broadcast_capacity);
    let consumer = tokio::spawn(EventConsumer::new(channel.subscribe()).run());
    let system = OrderSystem::new(&config, Arc::new(channel));

    for item in [
        InventoryItemCreate::new("Widget", 5, 2, "pcs", 4.50, "hardware"),
        InventoryItemCreate::new("Gadget", 20, 5, "pcs", 12.00, "hardware"),
        InventoryItemCreate::new("Flour", 3, 5, "kg", 1.20, "pantry"),
    ] {
        system.inventory.create_item(item).await?;
    }

    let address = DeliveryAddress {
        street: "221B Baker St".into(),
        city: "London".into(),
        state: "Greater London".into(),
        zip_code: "NW1 6XE".into(),
        country: "UK".into(),
    };

    let order = async {
        system
            .saga
            .place_order(OrderRequest {
                customer_id: "cust-1".into(),
                items: vec![LineItem::new("Widget", 3), LineItem::new("Gadget", 2)],
                delivery_address: address.clone(),
            })
            .await
    }
    .instrument(tracing::info_span!("order_processing"))
    .await?;
    info!(order_id = %order.id, total = order.total_amount, "Order placed");

    let rejected = system
        .saga
        .place_order(OrderRequest {
            customer_id: "cust-2".into(),
            items: vec![LineItem::new("Gadget", 1), LineItem::new("Widget", 10)],
            delivery_address: address,
        })
        .await;
    if let Err(e) = rejected {
        error!(error = %e, "Second order rejected");
    }

    let outcome = system
        .saga
        .update_order(order.id, OrderUpdate::status(OrderStatus::Cancelled))
        .await?;
    info!(
        order_id = %outcome.order.id,
        from = %outcome.old_status,
        to = %outcome.new_status,
        "Order cancelled"
    );

    let low = system.monitor.scan_all().await?;
    info!(count = low.len(), "Low-stock items");
    let summary = system.monitor.summary().await?;
    info!(?summary, "Inventory summary");

    system.shutdown().await?;

    match tokio::time::timeout(Duration::from_secs(1), consumer).await {
        Ok(Ok(handled)) => info!(handled, "Consumer drained"),
        _ => info!("Consumer still had events in flight"),
    }

    info!("Application completed successfully");
    Ok(())
}
