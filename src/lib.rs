//! # Stock Saga
//!
//! Orders placed against a shared, finite inventory.
//!
//! The interesting part is placing an order: check stock for every line,
//! persist the order, take the stock, and if anything fails part-way, put
//! everything back so no order exists without its stock and no stock is lost
//! to an order that does not exist. Notifications go out afterwards, best
//! effort, and can never change the outcome.
//!
//! ## Concurrency Model
//!
//! Inventory rows and orders each live in a
//! [`ResourceActor`](actor_framework::ResourceActor). The inventory actor
//! handles one request at a time, and a deduction is a single request that
//! re-reads the quantity and writes the new one. Two orders racing for the
//! same item are therefore serialized and cannot overdraw it.
//!
//! ## Module Tour
//!
//! ### 1. The Resources ([`inventory_actor`], [`order_actor`], [`model`])
//! [`ActorEntity`](actor_framework::ActorEntity) implementations and their data.
//!
//! ### 2. The Interface ([`clients`])
//! [`InventoryClient`](clients::InventoryClient) and [`OrderClient`](clients::OrderClient)
//! hide the message passing and return typed errors.
//!
//! ### 3. The Saga ([`saga`])
//! - [`AvailabilityChecker`](saga::AvailabilityChecker) - advisory pre-flight
//! - [`InventoryLedger`](saga::InventoryLedger) - all-or-nothing deduction with compensation
//! - [`OrderSaga`](saga::OrderSaga) - place/update orders, decide compensation
//! - [`LowStockMonitor`](saga::LowStockMonitor) - threshold alerts
//!
//! ### 4. Notifications ([`notify`])
//! Events, the [`EventChannel`](notify::EventChannel) port and the
//! fire-and-forget [`NotificationPublisher`](notify::NotificationPublisher).
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! [`SystemConfig`](lifecycle::SystemConfig) and [`OrderSystem`](lifecycle::OrderSystem).
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod inventory_actor;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod order_actor;
pub mod saga;
