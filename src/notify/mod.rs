//! # Notifications
//!
//! Domain events leave the process through an [`EventChannel`]. The
//! [`NotificationPublisher`] is the only caller of a channel; it sends in
//! background tasks so the saga never waits on, or fails because of, a slow
//! or broken channel. Delivery is at most once.
//!
//! | Topic | Messages |
//! |---|---|
//! | `order-events` | [`OrderEvent`] (`ORDER_PLACED`, `ORDER_STATUS_CHANGED`) |
//! | `inventory-alerts` | [`LowStockAlert`] |
//! | `analytics-events` | [`AnalyticsEvent`] (`NEW_ORDER`, `ORDER_STATUS_CHANGE`) |

pub mod channel;
pub mod consumer;
pub mod events;
pub mod publisher;

pub use channel::*;
pub use consumer::EventConsumer;
pub use events::*;
pub use publisher::NotificationPublisher;
