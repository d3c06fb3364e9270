//! The outbound port for events, plus the two in-process implementations.

use super::events::EventMessage;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, Notify};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChannelError {
    #[error("Channel unavailable: {0}")]
    Unavailable(String),

    #[error("Event serialization failed: {0}")]
    Serialization(String),

    #[error("Event rejected: {0}")]
    Rejected(String),
}

impl From<serde_json::Error> for ChannelError {
    fn from(e: serde_json::Error) -> Self {
        ChannelError::Serialization(e.to_string())
    }
}

/// Somewhere events can be sent. At most once, no retries.
#[async_trait]
pub trait EventChannel: Send + Sync {
    async fn send(&self, message: EventMessage) -> Result<(), ChannelError>;
}

const RECORD: u8 = 0;
const FAIL: u8 = 1;
const STALL: u8 = 2;

/// Records every message it accepts. Used by tests and as a default sink.
///
/// Can be switched into a failing mode (every send is rejected) or a stalled
/// mode (every send hangs forever) to exercise the publisher's error paths.
#[derive(Debug, Default)]
pub struct InMemoryChannel {
    messages: Mutex<Vec<EventMessage>>,
    mode: AtomicU8,
    arrived: Notify,
}

impl InMemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let channel = Self::default();
        channel.set_failing(true);
        channel
    }

    pub fn stalled() -> Self {
        let channel = Self::default();
        channel.mode.store(STALL, Ordering::SeqCst);
        channel
    }

    pub fn set_failing(&self, failing: bool) {
        self.mode
            .store(if failing { FAIL } else { RECORD }, Ordering::SeqCst);
    }

    /// Snapshot of everything accepted so far, in arrival order.
    pub fn messages(&self) -> Vec<EventMessage> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Waits until at least `count` messages have arrived or `timeout` passes,
    /// then returns what is there.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<EventMessage> {
        let _ = tokio::time::timeout(timeout, async {
            loop {
                let arrived = self.arrived.notified();
                if self.messages().len() >= count {
                    return;
                }
                arrived.await;
            }
        })
        .await;
        self.messages()
    }
}

#[async_trait]
impl EventChannel for InMemoryChannel {
    async fn send(&self, message: EventMessage) -> Result<(), ChannelError> {
        match self.mode.load(Ordering::SeqCst) {
            FAIL => Err(ChannelError::Unavailable("in-memory channel set to fail".into())),
            STALL => std::future::pending().await,
            _ => {
                self.messages
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(message);
                self.arrived.notify_waiters();
                Ok(())
            }
        }
    }
}

/// Fans events out to every live subscriber over a `tokio::sync::broadcast` channel.
///
/// A send with no subscribers is reported as [`ChannelError::Unavailable`].
#[derive(Debug, Clone)]
pub struct BroadcastChannel {
    sender: broadcast::Sender<EventMessage>,
}

impl BroadcastChannel {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventMessage> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl EventChannel for BroadcastChannel {
    async fn send(&self, message: EventMessage) -> Result<(), ChannelError> {
        self.sender
            .send(message)
            .map(|_| ())
            .map_err(|_| ChannelError::Unavailable("no subscribers".into()))
    }
}
