use crate::clients::{InventoryClient, OrderClient};
use crate::lifecycle::SystemConfig;
use crate::notify::{EventChannel, NotificationPublisher};
use crate::saga::{AvailabilityChecker, InventoryLedger, LowStockMonitor, OrderSaga};
use crate::{inventory_actor, order_actor};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("Actor task failed: {0}")]
    ActorTask(String),
}

/// The running system: both resource actors plus the saga components wired
/// on top of them.
///
/// # Architecture
///
/// - **Inventory actor**: one row per item name; deduct/restore are actions
/// - **Order actor**: order records
/// - **Saga components**: [`AvailabilityChecker`], [`InventoryLedger`],
///   [`LowStockMonitor`] and [`OrderSaga`], sharing one [`NotificationPublisher`]
///
/// # Example
///
/// ```ignore
/// let channel = Arc::new(InMemoryChannel::new());
/// let system = OrderSystem::new(&SystemConfig::default(), channel);
///
/// system.inventory.create_item(widget).await?;
/// let order = system.saga.place_order(request).await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// Catalog management and raw stock actions.
    pub inventory: InventoryClient,

    /// Direct access to order records. State changes should go through `saga`.
    pub orders: OrderClient,

    pub saga: OrderSaga,
    pub monitor: LowStockMonitor,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    /// Spawns the actors and wires the saga. Must be called inside a Tokio runtime.
    pub fn new(config: &SystemConfig, channel: Arc<dyn EventChannel>) -> Self {
        // 1. Create actors (no dependencies)
        let (inventory_actor, inventory_client) = inventory_actor::new(config.actor_buffer);
        let (order_actor, order_client) = order_actor::new(config.actor_buffer);

        // 2. Start actors
        let inventory_handle = tokio::spawn(inventory_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(()));

        // 3. Wire the saga components
        let inventory = InventoryClient::new(inventory_client);
        let orders = OrderClient::new(order_client);
        let publisher = NotificationPublisher::new(channel, config.notification_timeout);
        let monitor = LowStockMonitor::new(inventory.clone(), publisher.clone());
        let saga = OrderSaga::new(
            orders.clone(),
            AvailabilityChecker::new(inventory.clone()),
            InventoryLedger::new(inventory.clone(), monitor.clone()),
            publisher,
        );

        info!(actor_buffer = config.actor_buffer, "Order system started");
        Self {
            inventory,
            orders,
            saga,
            monitor,
            handles: vec![inventory_handle, order_handle],
        }
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Drops every client (including the ones held by the saga components),
    /// which closes the actor mailboxes, then waits for each actor task.
    /// Callers must have dropped any client clones they took, or this waits
    /// for them.
    pub async fn shutdown(self) -> Result<(), ShutdownError> {
        info!("Shutting down system...");

        let Self {
            inventory,
            orders,
            saga,
            monitor,
            handles,
        } = self;
        drop((inventory, orders, saga, monitor));

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(ShutdownError::ActorTask(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
