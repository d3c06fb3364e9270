//! # Generic Actor Server
//!
//! [`ResourceActor`] owns the store for one entity type and processes requests
//! strictly one after another.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// # Architecture Note
/// This is the "Server" half of the actor. It owns the state (`store`) and the
/// receiving end of the channel; [`ResourceClient`] is the other half.
///
/// **Concurrency Model**: the actor task is the only owner of `store`. Because
/// requests are handled sequentially, the body of an `Update` or `Action`
/// (read the current entity, decide, write the new entity) can never
/// interleave with another request for the same store. Resource types that
/// need row-level serialization get it from this loop without a lock.
///
/// Hooks work on a copy of the stored entity; the copy replaces the stored
/// value only when the hook succeeds, so a failed update or action leaves no
/// partial write behind.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new()` returns the actor and its client.
/// 2.  **Wire**: build the `Context` the hooks need (other clients, config).
/// 3.  **Run**: spawn `actor.run(context)` on the runtime.
///
/// ```rust
/// use actor_framework::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Tank { id: u32, litres: u32 }
/// #[derive(Debug)] struct TankCreate { litres: u32 }
/// #[derive(Debug)] enum TankAction { Drain(u32) }
/// #[derive(Debug, thiserror::Error)] #[error("not enough left")] struct TankError;
///
/// #[async_trait]
/// impl ActorEntity for Tank {
///     type Id = u32;
///     type Create = TankCreate;
///     type Update = ();
///     type Action = TankAction;
///     type ActionResult = u32;
///     type Context = ();
///     type Error = TankError;
///
///     fn assign_id(seq: u32, _: &TankCreate) -> u32 { seq }
///     fn from_create_params(id: u32, p: TankCreate) -> Result<Self, TankError> {
///         Ok(Self { id, litres: p.litres })
///     }
///     async fn on_update(&mut self, _: (), _: &()) -> Result<(), TankError> { Ok(()) }
///     async fn handle_action(&mut self, action: TankAction, _: &()) -> Result<u32, TankError> {
///         let TankAction::Drain(n) = action;
///         self.litres = self.litres.checked_sub(n).ok_or(TankError)?;
///         Ok(self.litres)
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Tank>::new(10);
///     tokio::spawn(actor.run(()));
///
///     let id = client.create(TankCreate { litres: 5 }).await.unwrap();
///     assert_eq!(client.perform_action(id, TankAction::Drain(3)).await.unwrap(), 2);
///     assert!(client.perform_action(id, TankAction::Drain(3)).await.is_err());
///     assert_eq!(client.get(id).await.unwrap().unwrap().litres, 2);
/// }
/// ```
///
/// # Operations
///
/// * **Create**:
///     1. Asks the entity for its key via `T::assign_id`, passing the next sequence number.
///     2. Fails with `AlreadyExists` if that key is taken.
///     3. Builds the entity with `T::from_create_params`, then runs `on_create`.
///     4. Stores it and returns the key.
///
/// * **Get** / **List**: return clones; the store is never lent out.
///
/// * **Update**:
///     1. Clones the stored entity into a draft.
///     2. Runs `on_update` on the draft.
///     3. On success the draft replaces the stored entity and is returned.
///
/// * **Delete**: runs `on_delete`, and removes the entity only if it succeeds.
///
/// * **Action**: like Update, but through `handle_action`, returning its result.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_seq: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates the actor and the client that talks to it.
    ///
    /// `buffer_size` bounds the mailbox; senders wait while it is full.
    /// The actor does nothing until [`run`](Self::run) is spawned.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_seq: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the message loop until every client has been dropped.
    ///
    /// # Context Injection
    /// `context` is handed to every entity hook. It is supplied here rather
    /// than in `new`, so it can hold clients of actors created later.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "Order" instead of "stock_saga::model::order::Order")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::assign_id(self.next_seq, &params);
                    self.next_seq = self.next_seq.wrapping_add(1);

                    if self.store.contains_key(&id) {
                        warn!(entity_type, %id, "Already exists");
                        let _ = respond_to.send(Err(FrameworkError::AlreadyExists(id.to_string())));
                        continue;
                    }

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, error = %e, "on_create failed");
                                let _ =
                                    respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                                continue;
                            }
                            self.store.insert(id.clone(), item);
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, size = self.store.len(), "List");
                    let items = self.store.values().cloned().collect();
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(current) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut draft = current.clone();
                    if let Err(e) = draft.on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.insert(id.clone(), draft.clone());
                    info!(entity_type, %id, "Updated");
                    let _ = respond_to.send(Ok(draft));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.remove(&id);
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(current) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut draft = current.clone();
                    let result = match draft.handle_action(action, &context).await {
                        Ok(value) => {
                            self.store.insert(id.clone(), draft);
                            info!(entity_type, %id, "Action ok");
                            Ok(value)
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Action failed");
                            Err(FrameworkError::EntityError(Box::new(e)))
                        }
                    };
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
