//! Top-level error for one harness run.

use crate::broker::BrokerError;
use crate::config::ConfigError;
use crate::listener::{ListenerError, StopReason};
use crate::publisher::PublishError;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinError;

/// Everything that can end a run early.
///
/// Component errors convert with `#[from]`, so the orchestrator and `main`
/// can use `?` throughout.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A broker client could not be created.
    #[error("startup failed: {0}")]
    Startup(#[source] BrokerError),

    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),

    #[error("listener failed: {0}")]
    Listener(#[from] ListenerError),

    /// The listener finished cleanly but before its group assignment arrived.
    #[error("listener stopped before it was ready ({0:?})")]
    ListenerNotReady(StopReason),

    /// The listener ignored cancellation and had to be aborted.
    #[error("listener did not stop within {0:?} and was aborted")]
    ListenerHung(Duration),

    /// The listener task panicked or was aborted.
    #[error("listener task failed: {0}")]
    ListenerTask(#[from] JoinError),
}

impl HarnessError {
    /// `2` for bad input, `1` for everything that went wrong at run time.
    pub fn exit_code(&self) -> u8 {
        match self {
            HarnessError::Config(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let config = HarnessError::Config(ConfigError::NoBrokers);
        assert_eq!(config.exit_code(), 2);

        let publish = HarnessError::Publish(PublishError::AckTimeout(Duration::from_secs(10)));
        assert_eq!(publish.exit_code(), 1);
        assert_eq!(publish.to_string(), "publish failed: no acknowledgment from broker within 10s");
    }
}
