//! Error types for the order publisher.

use crate::broker::BrokerError;
use std::time::Duration;
use thiserror::Error;

/// Errors that end a publish attempt. None of them is retried.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The order could not be encoded as JSON.
    #[error("failed to encode order: {0}")]
    Encode(#[from] serde_json::Error),

    /// The broker did not acknowledge the order in time.
    #[error("no acknowledgment from broker within {0:?}")]
    AckTimeout(Duration),

    /// The broker rejected the message or the transport failed.
    #[error("delivery failed: {0}")]
    Delivery(#[source] BrokerError),

    /// The acknowledged message could not be flushed.
    #[error("flush failed: {0}")]
    Flush(#[source] BrokerError),
}
