//! Type-safe wrappers around [`ResourceClient`](actor_framework::ResourceClient).
//!
//! `get`, `list` and `delete` come from [`ActorClient`]; each wrapper adds the
//! typed operations of its resource and turns [`FrameworkError`](actor_framework::FrameworkError)
//! back into the resource's own error.

pub mod inventory_client;
pub mod order_client;

pub use actor_framework::ActorClient;
pub use inventory_client::*;
pub use order_client::*;
