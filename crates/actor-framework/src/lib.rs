//! # Actor Framework
//!
//! Building blocks for managing stateful resources behind Tokio actors.
//!
//! Every resource type (an inventory row, an order) lives inside its own
//! [`ResourceActor`]. The actor owns the only copy of the store and drains its
//! mailbox one request at a time, so any read-check-write performed inside a
//! single request is serialized against every other request for that
//! resource type. Callers never touch the store directly; they talk to the
//! actor through a cloneable [`ResourceClient`].
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]) - domain data, id assignment, update hooks and
//!    resource-specific actions.
//! 2. **Runtime** ([`ResourceActor`]) - the message loop and the in-memory store.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]) - typed request/response
//!    over `mpsc` + `oneshot`.
//!
//! ## Example
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Counter {
//!     name: String,
//!     value: u32,
//! }
//!
//! #[derive(Debug)] struct CounterCreate { name: String }
//! #[derive(Debug)] struct CounterUpdate { value: u32 }
//! #[derive(Debug)] enum CounterAction { Increment }
//! #[derive(Debug, thiserror::Error)] #[error("counter error")] struct CounterError;
//!
//! #[async_trait]
//! impl ActorEntity for Counter {
//!     type Id = String;
//!     type Create = CounterCreate;
//!     type Update = CounterUpdate;
//!     type Action = CounterAction;
//!     type ActionResult = u32;
//!     type Context = ();
//!     type Error = CounterError;
//!
//!     fn assign_id(_seq: u32, params: &CounterCreate) -> String {
//!         params.name.clone()
//!     }
//!
//!     fn from_create_params(id: String, _params: CounterCreate) -> Result<Self, CounterError> {
//!         Ok(Self { name: id, value: 0 })
//!     }
//!
//!     async fn on_update(&mut self, update: CounterUpdate, _ctx: &()) -> Result<(), CounterError> {
//!         self.value = update.value;
//!         Ok(())
//!     }
//!
//!     async fn handle_action(&mut self, action: CounterAction, _ctx: &()) -> Result<u32, CounterError> {
//!         match action {
//!             CounterAction::Increment => {
//!                 self.value += 1;
//!                 Ok(self.value)
//!             }
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Counter>::new(10);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(CounterCreate { name: "hits".into() }).await.unwrap();
//!     assert_eq!(id, "hits");
//!     let value = client.perform_action(id, CounterAction::Increment).await.unwrap();
//!     assert_eq!(value, 1);
//! }
//! ```
//!
//! ## Testing
//!
//! See [`mock`] for scripted clients that let you inject storage failures
//! without spawning a real actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
