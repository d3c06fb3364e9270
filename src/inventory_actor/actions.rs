//! Custom actions for the Inventory actor.
//!
//! Each action runs inside the actor's message loop, so the read of the
//! current quantity and the write of the new one happen in a single step that
//! no other request for inventory can interleave with.

/// Stock operations beyond CRUD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryAction {
    /// Reads the current quantity without modifying it.
    CheckStock,
    /// Removes stock.
    ///
    /// # Errors
    /// Fails with `InsufficientStock` if the amount exceeds what is on hand;
    /// the row is left untouched.
    Deduct(u32),
    /// Adds stock back. No upper bound other than `u32::MAX`.
    Restore(u32),
}

/// Results from InventoryActions - variants match 1:1 with InventoryAction
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryActionResult {
    CheckStock(u32),
    Deduct(StockChange),
    Restore(StockChange),
}

/// A committed quantity change on one row, with the row as it now stands.
#[derive(Debug, Clone, PartialEq)]
pub struct StockChange {
    pub before: u32,
    pub after: u32,
    pub item: crate::model::InventoryItem,
}
