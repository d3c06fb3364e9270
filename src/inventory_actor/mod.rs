//! # Inventory Actor
//!
//! Owns every [`InventoryItem`] row. Rows are keyed by item name.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`InventoryItem`]
//! - [`error`] - [`InventoryError`]
//! - [`actions`] - [`InventoryAction`] and [`InventoryActionResult`]
//! - [`new()`] - creates the actor and its client
//!
//! ## Row-level serialization
//!
//! `Deduct` and `Restore` are actions, so the check of the current quantity
//! and the write of the new one are a single message. Two orders racing on
//! the same item are processed one after the other and can never both pass
//! the check against the same snapshot.
//!
//! ## Usage
//!
//! ```rust
//! use stock_saga::inventory_actor;
//! use stock_saga::clients::InventoryClient;
//! use stock_saga::model::InventoryItemCreate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = inventory_actor::new(32);
//!     let client = InventoryClient::new(generic_client);
//!     tokio::spawn(actor.run(()));
//!
//!     client
//!         .create_item(InventoryItemCreate::new("Widget", 10, 2, "pcs", 4.5, "hardware"))
//!         .await?;
//!     let change = client.deduct("Widget", 3).await?;
//!     assert_eq!(change.after, 7);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::InventoryItem;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Inventory actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<InventoryItem>, ResourceClient<InventoryItem>) {
    ResourceActor::new(buffer_size)
}
