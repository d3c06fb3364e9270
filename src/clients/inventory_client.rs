//! # Inventory Client
//!
//! Provides a high-level API for interacting with the `InventoryItem` actor.
//! It wraps a `ResourceClient<InventoryItem>` and exposes the stock actions as
//! plain methods with typed results.
use crate::inventory_actor::{InventoryAction, InventoryActionResult, InventoryError, StockChange};
use crate::model::{InventoryItem, InventoryItemCreate, InventoryItemUpdate};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Inventory actor.
#[derive(Clone)]
pub struct InventoryClient {
    inner: ResourceClient<InventoryItem>,
}

impl InventoryClient {
    pub fn new(inner: ResourceClient<InventoryItem>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<InventoryItem> for InventoryClient {
    type Error = InventoryError;

    fn inner(&self) -> &ResourceClient<InventoryItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(name) => InventoryError::NotFound(name),
            FrameworkError::AlreadyExists(name) => InventoryError::AlreadyExists(name),
            other => other
                .downcast_entity::<InventoryError>()
                .unwrap_or_else(|e| InventoryError::ActorCommunicationError(e.to_string())),
        }
    }
}

fn unexpected(result: InventoryActionResult) -> InventoryError {
    InventoryError::ActorCommunicationError(format!("unexpected action result: {result:?}"))
}

impl InventoryClient {
    /// Adds a row to the catalog. Returns its key, the item name.
    #[instrument(skip(self))]
    pub async fn create_item(&self, params: InventoryItemCreate) -> Result<String, InventoryError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_item(
        &self,
        name: &str,
        update: InventoryItemUpdate,
    ) -> Result<InventoryItem, InventoryError> {
        debug!("Sending request");
        self.inner
            .update(name.to_string(), update)
            .await
            .map_err(Self::map_error)
    }

    /// Current quantity of an item.
    #[instrument(skip(self))]
    pub async fn check_stock(&self, name: &str) -> Result<u32, InventoryError> {
        debug!("Checking stock");
        match self
            .inner
            .perform_action(name.to_string(), InventoryAction::CheckStock)
            .await
            .map_err(Self::map_error)?
        {
            InventoryActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Removes `quantity` units in one serialized step.
    ///
    /// Fails with [`InventoryError::InsufficientStock`] and leaves the row
    /// untouched if fewer units are on hand.
    #[instrument(skip(self))]
    pub async fn deduct(&self, name: &str, quantity: u32) -> Result<StockChange, InventoryError> {
        debug!("Deducting stock");
        match self
            .inner
            .perform_action(name.to_string(), InventoryAction::Deduct(quantity))
            .await
            .map_err(Self::map_error)?
        {
            InventoryActionResult::Deduct(change) => Ok(change),
            other => Err(unexpected(other)),
        }
    }

    /// Adds `quantity` units back.
    #[instrument(skip(self))]
    pub async fn restore(&self, name: &str, quantity: u32) -> Result<StockChange, InventoryError> {
        debug!("Restoring stock");
        match self
            .inner
            .perform_action(name.to_string(), InventoryAction::Restore(quantity))
            .await
            .map_err(Self::map_error)?
        {
            InventoryActionResult::Restore(change) => Ok(change),
            other => Err(unexpected(other)),
        }
    }
}
