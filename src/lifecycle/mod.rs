//! # System Lifecycle
//!
//! Creates the actors, injects clients into the saga components and tears
//! everything down again.
//!
//! ## Startup
//!
//! 1. **Configuration** - [`SystemConfig::from_env`] (defaults for anything unset)
//! 2. **Observability** - [`setup_tracing`]
//! 3. **Actors** - [`OrderSystem::new`] spawns the inventory and order actors
//! 4. **Wiring** - checker, ledger, monitor and saga get their clients and the
//!    shared publisher at construction
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - closes the sender side of each mailbox
//! 2. **Actors detect closure** - `receiver.recv()` returns `None`
//! 3. **Await completion** - [`OrderSystem::shutdown`] joins every actor task
//!
//! Event sends already in flight are not awaited; delivery is best effort.

pub mod config;
pub mod order_system;

pub use actor_framework::tracing::setup_tracing;
pub use config::*;
pub use order_system::*;
