//! # ActorEntity Trait
//!
//! The contract a resource type implements to be managed by a
//! [`ResourceActor`](crate::ResourceActor).
//!
//! Associated types pin every payload to its entity: an inventory actor only
//! accepts inventory create/update/action payloads, and the compiler rejects
//! anything else.
//!
//! # Hooks
//! `on_create` and `on_delete` have default no-op implementations. `on_update`
//! and `handle_action` must be provided. Hooks run inside the actor's message
//! loop, so whatever they do to `self` is atomic with respect to every other
//! request the actor receives.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
///
/// # Identity
/// The entity decides its own key through [`ActorEntity::assign_id`]. Entities
/// with a natural key (a unique name) derive it from the create payload;
/// entities with a generated key ignore the payload and mint one. The actor
/// rejects a create whose key is already present.
///
/// # Context
/// `Context` is injected into every hook by [`ResourceActor::run`](crate::ResourceActor::run),
/// which lets dependencies be bound after construction. Use `()` when there are none.
#[async_trait]
pub trait ActorEntity: Clone + Debug + Send + Sync + 'static {
    /// Unique key of the entity inside its actor.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Payload required to create a new instance.
    type Create: Send + Sync + Debug;

    /// Payload required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations beyond CRUD.
    type Action: Send + Sync + Debug;

    /// Result returned by a successful action.
    type ActionResult: Send + Sync + Debug;

    /// Dependencies injected into every hook.
    type Context: Send + Sync;

    /// Entity-level failure, boxed into [`FrameworkError::EntityError`](crate::FrameworkError::EntityError).
    ///
    /// # Error Granularity
    /// One error enum covers every hook and action of the entity, rather than
    /// one per message. Clients match on a single type (`InventoryError`,
    /// `OrderError`), at the cost of the type allowing variants a given action
    /// never produces. Callers recover it with
    /// [`FrameworkError::downcast_entity`](crate::FrameworkError::downcast_entity).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Computes the key for a new entity.
    ///
    /// `seq` starts at 1 and grows by one per create request, including
    /// requests that fail. Entities keyed by a counter return it; entities
    /// with a natural or caller-chosen key read it from `params` and ignore
    /// `seq`.
    fn assign_id(seq: u32, params: &Self::Create) -> Self::Id;

    /// Builds the entity from its key and payload. Validation belongs here.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction, before the entity is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update. On error the stored entity must be left untouched.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called before the entity is removed. An error keeps it in the store.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Executes a resource-specific action against the stored entity.
    ///
    /// Runs on a draft copy inside the message loop: the check and the write
    /// it guards happen with no other request in between, and an error
    /// discards the draft.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
