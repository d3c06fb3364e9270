//! # ActorClient Trait
//!
//! Shared read/delete operations for resource-specific client wrappers.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the standard read operations.
///
/// A wrapper supplies its inner [`ResourceClient`] and a mapping from
/// [`FrameworkError`] into its own error type; `get`, `list` and `delete`
/// come for free.
///
/// # Example
///
/// ```rust
/// use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)]
/// struct Tag { label: String }
/// #[derive(Debug)] struct TagCreate { label: String }
/// #[derive(Debug, thiserror::Error)] #[error("tag error: {0}")] struct TagError(String);
///
/// #[async_trait]
/// impl ActorEntity for Tag {
///     type Id = String; type Create = TagCreate; type Update = ();
///     type Action = (); type ActionResult = (); type Context = (); type Error = TagError;
///     fn assign_id(_: u32, params: &TagCreate) -> String { params.label.clone() }
///     fn from_create_params(id: String, _: TagCreate) -> Result<Self, TagError> { Ok(Self { label: id }) }
///     async fn on_update(&mut self, _: (), _: &()) -> Result<(), TagError> { Ok(()) }
///     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), TagError> { Ok(()) }
/// }
///
/// #[derive(Clone)]
/// struct TagClient { inner: ResourceClient<Tag> }
///
/// impl ActorClient<Tag> for TagClient {
///     type Error = TagError;
///     fn inner(&self) -> &ResourceClient<Tag> { &self.inner }
///     fn map_error(e: FrameworkError) -> TagError { TagError(e.to_string()) }
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch every entity held by the actor.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list().await.map_err(Self::map_error)
    }

    /// Delete an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
