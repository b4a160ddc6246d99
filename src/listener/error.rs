//! Error types for the report listener.

use crate::broker::BrokerError;
use thiserror::Error;

/// Errors that stop the listener. They are returned through the task's
/// `JoinHandle`, never swallowed.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Joining the consumer group failed.
    #[error("subscribe failed: {0}")]
    Subscribe(#[source] BrokerError),

    /// The broker returned an error while consuming.
    #[error("consume failed: {0}")]
    Receive(#[source] BrokerError),
}
