//! # Broker Errors
//!
//! Failures reported by the transport layer, whichever implementation sits
//! behind the [`OrderSink`](super::OrderSink) / [`ReportSource`](super::ReportSource) traits.

use rdkafka::error::KafkaError;
use thiserror::Error;

/// Errors raised by a broker client.
#[derive(Debug, Clone, Error)]
pub enum BrokerError {
    /// The client library could not build a producer or consumer.
    #[error("failed to create Kafka {role}: {source}")]
    Startup {
        role: &'static str,
        #[source]
        source: KafkaError,
    },

    /// An error reported by librdkafka after the client was built.
    #[error(transparent)]
    Kafka(#[from] KafkaError),

    /// A transport failure from a non-Kafka source (mocks, adapters).
    #[error("transport error: {0}")]
    Transport(String),
}
