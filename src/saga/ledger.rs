//! # Inventory Ledger
//!
//! Deducts and restores stock line by line. Each single-item step is an
//! action on the inventory actor, so the re-check of the quantity and the
//! write happen as one serialized step.
//!
//! A `deduct` call either commits every line or leaves stock as it found it:
//! on the first failing line, the lines this call already took are restored
//! in reverse order from the records it accumulated. Records never outlive
//! the call.

use super::monitor::LowStockMonitor;
use crate::clients::InventoryClient;
use crate::inventory_actor::InventoryError;
use crate::model::LineItem;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

/// One line taken by a `deduct` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeductionRecord {
    pub item_name: String,
    pub quantity_before: u32,
    pub quantity_deducted: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommittedDeductions {
    pub records: Vec<DeductionRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub restored: Vec<LineItem>,
    /// Items that no longer exist. Their lines were skipped.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("Inventory item not found: {0}")]
    ItemNotFound(String),

    #[error("Insufficient stock for {item}: requested {requested}, available {available}")]
    InsufficientStock {
        item: String,
        requested: u32,
        available: u32,
    },

    #[error("Inventory storage error on {item}: {reason}")]
    Storage { item: String, reason: String },

    /// A compensating write failed. `uncompensated` lists the changes still
    /// applied to stock; they need an operator.
    #[error("Compensation failed on {item}: {reason} ({} change(s) left in place)", .uncompensated.len())]
    CompensationFailed {
        item: String,
        reason: String,
        uncompensated: Vec<DeductionRecord>,
    },
}

impl LedgerError {
    fn from_inventory(item: &str, e: InventoryError) -> Self {
        match e {
            InventoryError::NotFound(name) => LedgerError::ItemNotFound(name),
            InventoryError::InsufficientStock {
                item,
                requested,
                available,
            } => LedgerError::InsufficientStock {
                item,
                requested,
                available,
            },
            other => LedgerError::Storage {
                item: item.to_string(),
                reason: other.to_string(),
            },
        }
    }

    /// The item the failure is about.
    pub fn item(&self) -> &str {
        match self {
            LedgerError::ItemNotFound(item) => item,
            LedgerError::InsufficientStock { item, .. }
            | LedgerError::Storage { item, .. }
            | LedgerError::CompensationFailed { item, .. } => item,
        }
    }
}

#[derive(Clone)]
pub struct InventoryLedger {
    inventory: InventoryClient,
    monitor: LowStockMonitor,
}

impl InventoryLedger {
    pub fn new(inventory: InventoryClient, monitor: LowStockMonitor) -> Self {
        Self { inventory, monitor }
    }

    /// Takes every line, in order, or none of them.
    ///
    /// Items that end at or below their threshold raise a low-stock alert;
    /// the alert is sent in the background.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn deduct(&self, lines: &[LineItem]) -> Result<CommittedDeductions, LedgerError> {
        let mut records = Vec::with_capacity(lines.len());
        for line in lines {
            match self.inventory.deduct(&line.item_name, line.quantity).await {
                Ok(change) => {
                    debug!(item = %line.item_name, before = change.before, after = change.after, "Deducted");
                    records.push(DeductionRecord {
                        item_name: line.item_name.clone(),
                        quantity_before: change.before,
                        quantity_deducted: line.quantity,
                    });
                    if change.item.is_low_stock() {
                        self.monitor.alert(&change.item);
                    }
                }
                Err(e) => {
                    let failure = LedgerError::from_inventory(&line.item_name, e);
                    warn!(item = %line.item_name, error = %failure, taken = records.len(), "Deduction aborted, compensating");
                    self.compensate(records).await?;
                    return Err(failure);
                }
            }
        }
        info!(lines = records.len(), "Deductions committed");
        Ok(CommittedDeductions { records })
    }

    /// Gives back exactly what `records` took, newest first.
    ///
    /// Adds `quantity_deducted` rather than writing `quantity_before` back, so
    /// a deduction by another order in between is not undone with it.
    async fn compensate(&self, mut records: Vec<DeductionRecord>) -> Result<(), LedgerError> {
        while let Some(record) = records.pop() {
            if let Err(e) = self
                .inventory
                .restore(&record.item_name, record.quantity_deducted)
                .await
            {
                let item = record.item_name.clone();
                records.push(record);
                error!(
                    item = %item,
                    error = %e,
                    uncompensated = records.len(),
                    "Compensation failed, manual intervention required"
                );
                return Err(LedgerError::CompensationFailed {
                    item,
                    reason: e.to_string(),
                    uncompensated: records,
                });
            }
            debug!(item = %record.item_name, quantity = record.quantity_deducted, "Compensated");
        }
        Ok(())
    }

    /// Adds every line back. Missing items are skipped with a warning.
    ///
    /// If a line fails for any other reason, the lines this call already
    /// added are taken out again and the failure is returned, so a failed
    /// restore leaves stock unchanged.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn restore(&self, lines: &[LineItem]) -> Result<RestoreReport, LedgerError> {
        let mut report = RestoreReport::default();
        let mut applied: Vec<DeductionRecord> = Vec::new();
        for line in lines {
            match self.inventory.restore(&line.item_name, line.quantity).await {
                Ok(change) => {
                    debug!(item = %line.item_name, before = change.before, after = change.after, "Restored");
                    applied.push(DeductionRecord {
                        item_name: line.item_name.clone(),
                        quantity_before: change.before,
                        quantity_deducted: line.quantity,
                    });
                    report.restored.push(line.clone());
                }
                Err(InventoryError::NotFound(_)) => {
                    warn!(item = %line.item_name, quantity = line.quantity, "Item missing, restore skipped");
                    report.skipped.push(line.item_name.clone());
                }
                Err(e) => {
                    let failure = LedgerError::from_inventory(&line.item_name, e);
                    warn!(item = %line.item_name, error = %failure, "Restore aborted, reverting");
                    self.revert_restore(applied).await?;
                    return Err(failure);
                }
            }
        }
        info!(restored = report.restored.len(), skipped = report.skipped.len(), "Stock restored");
        Ok(report)
    }

    async fn revert_restore(&self, mut applied: Vec<DeductionRecord>) -> Result<(), LedgerError> {
        while let Some(record) = applied.pop() {
            if let Err(e) = self
                .inventory
                .deduct(&record.item_name, record.quantity_deducted)
                .await
            {
                let item = record.item_name.clone();
                applied.push(record);
                error!(
                    item = %item,
                    error = %e,
                    "Reverting restore failed, manual intervention required"
                );
                return Err(LedgerError::CompensationFailed {
                    item,
                    reason: e.to_string(),
                    uncompensated: applied,
                });
            }
        }
        Ok(())
    }
}
