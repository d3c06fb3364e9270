//! Error types for the Inventory actor.

use thiserror::Error;

/// Errors that can occur during inventory operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    /// No row carries this item name.
    #[error("Inventory item not found: {0}")]
    NotFound(String),

    /// Item names are unique.
    #[error("Inventory item already exists: {0}")]
    AlreadyExists(String),

    /// The requested quantity exceeds the stock on hand.
    #[error("Insufficient stock for {item}: requested {requested}, available {available}")]
    InsufficientStock {
        item: String,
        requested: u32,
        available: u32,
    },

    /// The row data provided is invalid.
    #[error("Invalid inventory item: {0}")]
    InvalidItem(String),

    /// Restoring would push the quantity past `u32::MAX`.
    #[error("Quantity overflow for {item}: {current} + {added}")]
    QuantityOverflow { item: String, current: u32, added: u32 },

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
