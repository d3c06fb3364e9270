//! # Order Client
//!
//! Provides a high-level API for interacting with the `Order` actor.
//! It wraps a `ResourceClient<Order>`; the orchestration itself lives in
//! [`OrderSaga`](crate::saga::OrderSaga).
use crate::model::{Order, OrderCreate, OrderId, OrderUpdate};
use crate::order_actor::OrderError;
use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Stores a new order and returns it as stored.
    ///
    /// The record is rebuilt from `params` rather than read back, so a failed
    /// read can never hide a committed create.
    #[instrument(skip(self, params), fields(order_id = %params.id))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<Order, OrderError> {
        debug!("Sending request");
        let id = self
            .inner
            .create(params.clone())
            .await
            .map_err(Self::map_error)?;
        Order::from_create_params(id, params)
    }

    #[instrument(skip(self))]
    pub async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => other
                .downcast_entity::<OrderError>()
                .unwrap_or_else(|e| OrderError::Storage(e.to_string())),
        }
    }
}
