//! Error types for the Order actor and the order saga.

use crate::model::OrderStatus;
use crate::saga::LedgerError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The order data provided is invalid. Raised before any stock is touched.
    #[error("Order validation error: {0}")]
    Validation(String),

    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// An item is missing or short. `available` is `None` when the item does not exist.
    #[error("Stock unavailable for {item}: requested {requested}, available {}", describe_available(.available))]
    StockUnavailable {
        item: String,
        requested: u32,
        available: Option<u32>,
    },

    /// The ledger failed; any partial deduction has already been compensated.
    #[error("Inventory failure: {0}")]
    InventoryFailure(LedgerError),

    /// A compensating write failed. Inventory or orders may be inconsistent
    /// and need an operator.
    #[error("Compensation failure: {0}")]
    CompensationFailure(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// The order store could not be reached or rejected the request.
    #[error("Order storage error: {0}")]
    Storage(String),
}

fn describe_available(available: &Option<u32>) -> String {
    available.map_or_else(|| "none".to_string(), |a| a.to_string())
}

impl From<LedgerError> for OrderError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::CompensationFailed { .. } => OrderError::CompensationFailure(e.to_string()),
            other => OrderError::InventoryFailure(other),
        }
    }
}
