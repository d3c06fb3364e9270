//! Runtime settings, read from the environment.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const ACTOR_BUFFER_VAR: &str = "STOCK_SAGA_ACTOR_BUFFER";
pub const NOTIFY_TIMEOUT_VAR: &str = "STOCK_SAGA_NOTIFY_TIMEOUT_MS";
pub const BROADCAST_CAPACITY_VAR: &str = "STOCK_SAGA_BROADCAST_CAPACITY";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Mailbox size of each resource actor.
    pub actor_buffer: usize,
    /// Upper bound on a single event send.
    pub notification_timeout: Duration,
    /// Buffer of the broadcast event channel.
    pub broadcast_capacity: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            actor_buffer: 32,
            notification_timeout: Duration::from_secs(5),
            broadcast_capacity: 256,
        }
    }
}

impl SystemConfig {
    /// Defaults overridden by whichever `STOCK_SAGA_*` variables are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`SystemConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            actor_buffer: positive(&lookup, ACTOR_BUFFER_VAR)?.unwrap_or(defaults.actor_buffer),
            notification_timeout: positive::<u64>(&lookup, NOTIFY_TIMEOUT_VAR)?
                .map(Duration::from_millis)
                .unwrap_or(defaults.notification_timeout),
            broadcast_capacity: positive(&lookup, BROADCAST_CAPACITY_VAR)?
                .unwrap_or(defaults.broadcast_capacity),
        })
    }
}

fn positive<T>(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let invalid = |reason: String| ConfigError::Invalid {
        var: var.to_string(),
        value: raw.clone(),
        reason,
    };
    let value = raw.trim().parse::<T>().map_err(|e| invalid(e.to_string()))?;
    if value == T::default() {
        return Err(invalid("must be greater than zero".into()));
    }
    Ok(Some(value))
}
