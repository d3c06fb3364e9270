//! # Order Actor
//!
//! Holds every [`Order`]. Has no custom actions; status changes go through
//! `Update`, where leaving `CANCELLED` is refused.
//!
//! Stock is never touched here. Deduction on placement and restoration on
//! cancellation are sequenced by the [`OrderSaga`](crate::saga::OrderSaga).

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::Order;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(buffer_size)
}
