//! Broker seam.
//!
//! The harness talks to the message broker through two small traits:
//!
//! - [`OrderSink`]: publish one payload and wait for the acknowledgment.
//! - [`ReportSource`]: join a consumer group and pull messages one at a time.
//!
//! [`kafka`] implements both on top of `rdkafka`. [`mock`] provides in-memory
//! versions with expectation builders so the publisher, listener and
//! orchestrator can be tested without a running broker.

pub mod error;
pub mod kafka;
pub mod mock;

pub use error::*;

use async_trait::async_trait;
use std::fmt;

/// Where the broker stored a published message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub partition: i32,
    pub offset: i64,
}

impl fmt::Display for DeliveryReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "partition={} offset={}", self.partition, self.offset)
    }
}

/// An owned copy of one consumed message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportMessage {
    pub partition: i32,
    pub offset: i64,
    pub key: Option<Vec<u8>>,
    /// Header names with the size of their value in bytes.
    pub headers: Vec<(String, usize)>,
    pub payload: Option<Vec<u8>>,
}

impl ReportMessage {
    pub fn with_payload(partition: i32, offset: i64, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            partition,
            offset,
            payload: Some(payload.into()),
            ..Self::default()
        }
    }

    pub fn payload_len(&self) -> usize {
        self.payload.as_ref().map_or(0, Vec::len)
    }

    /// Key rendered for logs, `-` when absent.
    pub fn key_display(&self) -> String {
        match &self.key {
            Some(key) => String::from_utf8_lossy(key).into_owned(),
            None => "-".to_string(),
        }
    }

    /// Headers rendered as `name[NB],...` for logs, `-` when there are none.
    pub fn headers_display(&self) -> String {
        if self.headers.is_empty() {
            return "-".to_string();
        }
        self.headers
            .iter()
            .map(|(name, len)| format!("{name}[{len}B]"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Publishing half of the broker.
#[async_trait]
pub trait OrderSink: Send + Sync {
    /// Publishes `payload` to `topic` and resolves once the broker acknowledged it.
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<DeliveryReceipt, BrokerError>;

    /// Waits for any queued messages to leave the client.
    async fn flush(&self) -> Result<(), BrokerError>;
}

/// Consuming half of the broker.
///
/// Every method takes `&self` so the listener can poll for messages and probe
/// the group assignment from the same `select!`.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Joins the consumer group for `topic`. Returns before an assignment exists.
    fn subscribe(&self, topic: &str) -> Result<(), BrokerError>;

    /// True once the group coordinator handed this member at least one partition.
    fn is_assigned(&self) -> Result<bool, BrokerError>;

    /// Next message; `Ok(None)` means the source has no more messages to give.
    async fn next_report(&self) -> Result<Option<ReportMessage>, BrokerError>;

    /// Leaves the group. Called once, when the listener stops.
    fn close(&self);
}
