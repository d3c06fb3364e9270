//! # Mock Framework
//!
//! Scripted stand-ins for a [`ResourceActor`](crate::ResourceActor), used to
//! test code that depends on a resource without running the real store.
//!
//! | | `MockClient` | Real actor |
//! |---|---|---|
//! | State | scripted responses | real store |
//! | Failure injection | `return_err(..)` on any request | needs a crafted state |
//! | Use case | code *around* a client (sagas, wrappers) | the entity itself, full flows |
//!
//! ## Scripted expectations
//!
//! [`MockClient`] answers requests in the order expectations were queued and
//! panics inside its responder task when the next request does not match the
//! next expectation (the caller then sees [`FrameworkError::ActorDropped`]).
//! Call [`MockClient::verify`] at the end of a test to make sure nothing queued
//! was left unused.
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Shelf { code: String }
//! #[derive(Debug)] struct ShelfCreate { code: String }
//! #[derive(Debug, thiserror::Error)] #[error("shelf error")] struct ShelfError;
//!
//! #[async_trait]
//! impl ActorEntity for Shelf {
//!     type Id = String; type Create = ShelfCreate; type Update = ();
//!     type Action = (); type ActionResult = (); type Context = (); type Error = ShelfError;
//!     fn assign_id(_: u32, params: &ShelfCreate) -> String { params.code.clone() }
//!     fn from_create_params(id: String, _: ShelfCreate) -> Result<Self, ShelfError> { Ok(Self { code: id }) }
//!     async fn on_update(&mut self, _: (), _: &()) -> Result<(), ShelfError> { Ok(()) }
//!     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), ShelfError> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Shelf>::new();
//!     mock.expect_delete("A1".to_string()).return_err(FrameworkError::ActorClosed);
//!
//!     let client = mock.client();
//!     let result = client.delete("A1".to_string()).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```
//!
//! ## Raw receivers
//!
//! [`create_mock_client`] hands back the mailbox itself; the `expect_*` free
//! functions pull the next request off it so a test can inspect the payload
//! and answer by hand.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// One queued request and the response it should receive.
enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn push<T: ActorEntity>(queue: &Queue<T>, expectation: Expectation<T>) {
    queue
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .push_back(expectation);
}

fn answer<R>(respond_to: oneshot::Sender<Result<R, FrameworkError>>, response: Result<R, FrameworkError>) {
    let _ = respond_to.send(response);
}

/// A mock client with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<Order>::new();
/// mock.expect_create().return_ok(order_id);
/// mock.expect_delete(order_id).return_err(FrameworkError::ActorClosed);
///
/// let orders = OrderClient::new(mock.client());
/// // drive the code under test...
/// mock.verify();
/// ```
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations. Must run inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .pop_front();

                match (request, expectation) {
                    (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get { id: expected, response })) => {
                        assert_eq!(id, expected, "get called with unexpected id");
                        answer(respond_to, response);
                    }
                    (ResourceRequest::List { respond_to }, Some(Expectation::List { response })) => {
                        answer(respond_to, response);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                        answer(respond_to, response);
                    }
                    (ResourceRequest::Update { id, respond_to, .. }, Some(Expectation::Update { id: expected, response })) => {
                        assert_eq!(id, expected, "update called with unexpected id");
                        answer(respond_to, response);
                    }
                    (ResourceRequest::Delete { id, respond_to }, Some(Expectation::Delete { id: expected, response })) => {
                        assert_eq!(id, expected, "delete called with unexpected id");
                        answer(respond_to, response);
                    }
                    (ResourceRequest::Action { id, respond_to, .. }, Some(Expectation::Action { id: expected, response })) => {
                        assert_eq!(id, expected, "action called with unexpected id");
                        answer(respond_to, response);
                    }
                    (request, _) => {
                        panic!("Unexpected request or expectation mismatch: {request:?}");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| Expectation::Get { id, response })
    }

    /// Expects a `list` operation.
    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::List { response })
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Create { response })
    }

    /// Expects an `update` operation.
    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| Expectation::Update { id, response })
    }

    /// Expects a `delete` operation.
    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| Expectation::Delete { id, response })
    }

    /// Expects an `action` operation.
    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| Expectation::Action { id, response })
    }

    /// Number of queued expectations not yet consumed.
    pub fn remaining(&self) -> usize {
        self.expectations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.remaining();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Completes a queued expectation with its response.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    queue: Queue<T>,
    build: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    fn new(
        queue: Queue<T>,
        build: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> Self {
        Self {
            queue,
            build: Box::new(build),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        push(&self.queue, (self.build)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        push(&self.queue, (self.build)(Err(error)));
    }
}

// =============================================================================
// RAW RECEIVER HELPERS
// =============================================================================

/// Creates a client whose requests land on a receiver the test controls.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
#[allow(clippy::type_complexity)]
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Bin {
        code: String,
        level: u32,
    }

    #[derive(Debug)]
    struct BinCreate {
        code: String,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("bin error")]
    struct BinError;

    #[async_trait]
    impl ActorEntity for Bin {
        type Id = String;
        type Create = BinCreate;
        type Update = u32;
        type Action = ();
        type ActionResult = u32;
        type Context = ();
        type Error = BinError;

        fn assign_id(_seq: u32, params: &BinCreate) -> String {
            params.code.clone()
        }

        fn from_create_params(id: String, _params: BinCreate) -> Result<Self, BinError> {
            Ok(Self { code: id, level: 0 })
        }

        async fn on_update(&mut self, level: u32, _ctx: &()) -> Result<(), BinError> {
            self.level = level;
            Ok(())
        }

        async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<u32, BinError> {
            Ok(self.level)
        }
    }

    #[tokio::test]
    async fn test_raw_receiver_sees_create_payload() {
        let (client, mut receiver) = create_mock_client::<Bin>(10);

        let create_task = tokio::spawn(async move {
            client.create(BinCreate { code: "B7".to_string() }).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.code, "B7");
        responder.send(Ok("B7".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result.unwrap(), "B7");
    }

    #[tokio::test]
    async fn test_scripted_responses_in_order() {
        let mut mock = MockClient::<Bin>::new();
        mock.expect_create().return_ok("B1".to_string());
        mock.expect_update("B1".to_string()).return_ok(Bin { code: "B1".into(), level: 4 });
        mock.expect_list().return_ok(vec![Bin { code: "B1".into(), level: 4 }]);
        mock.expect_delete("B1".to_string()).return_err(FrameworkError::NotFound("B1".into()));

        let client = mock.client();
        assert_eq!(client.create(BinCreate { code: "B1".into() }).await.unwrap(), "B1");
        assert_eq!(client.update("B1".to_string(), 4).await.unwrap().level, 4);
        assert_eq!(client.list().await.unwrap().len(), 1);
        assert!(matches!(
            client.delete("B1".to_string()).await,
            Err(FrameworkError::NotFound(_))
        ));

        mock.verify();
    }

    #[tokio::test]
    async fn test_mismatch_drops_the_response() {
        let mut mock = MockClient::<Bin>::new();
        mock.expect_get("B1".to_string()).return_ok(None);

        let result = mock.client().list().await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
    }
}
