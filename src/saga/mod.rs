//! # Order Saga Components
//!
//! - [`AvailabilityChecker`] - read-only stock pre-flight
//! - [`InventoryLedger`] - all-or-nothing deduction, additive restoration
//! - [`OrderSaga`] - places and updates orders, decides compensation
//! - [`LowStockMonitor`] - threshold alerts and catalog health
//!
//! Components take their clients and publisher at construction, so any of
//! them can run against a [`MockClient`](actor_framework::mock::MockClient) or
//! an [`InMemoryChannel`](crate::notify::InMemoryChannel).

pub mod checker;
pub mod ledger;
pub mod monitor;
pub mod orchestrator;

pub use checker::{Availability, AvailabilityChecker};
pub use ledger::{CommittedDeductions, DeductionRecord, InventoryLedger, LedgerError, RestoreReport};
pub use monitor::LowStockMonitor;
pub use orchestrator::OrderSaga;
