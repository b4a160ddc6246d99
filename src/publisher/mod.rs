//! # Order Publisher
//!
//! Publishes the one order of a run and waits for the broker to acknowledge it.
//!
//! The publisher owns its [`OrderSink`] (and therefore its producer
//! connection); when [`OrderPublisher::publish`] returns, the publisher is
//! consumed and the connection is closed.
//!
//! Console output, in order:
//!
//! ```text
//! [producer] Sending to topic='new_orders' brokers=[localhost:9092]
//! [producer] order payload:
//! { ...indented order... }
//! [producer] sent partition=0 offset=42
//! ```

pub mod error;

pub use error::*;

use crate::broker::{DeliveryReceipt, OrderSink};
use crate::config::RunConfig;
use crate::console::Console;
use crate::model::NewOrder;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

pub struct OrderPublisher<S: OrderSink> {
    sink: S,
    topic: String,
    brokers: String,
    ack_timeout: Duration,
    console: Console,
}

impl<S: OrderSink> OrderPublisher<S> {
    pub fn new(sink: S, config: &RunConfig, console: Console) -> Self {
        Self {
            sink,
            topic: config.orders_topic.clone(),
            brokers: config.brokers_display(),
            ack_timeout: config.ack_timeout,
            console,
        }
    }

    /// Sends `order` and blocks until it is acknowledged or the ack timeout elapses.
    #[instrument(skip_all, fields(topic = %self.topic))]
    pub async fn publish(self, order: &NewOrder) -> Result<DeliveryReceipt, PublishError> {
        debug!(?order, "publish called");
        let payload = order.to_json_bytes()?;

        self.console.line(&format!(
            "[producer] Sending to topic='{}' brokers={}",
            self.topic, self.brokers
        ));
        self.console.block("[producer] order payload:", &order.to_pretty_json()?);

        info!(bytes = payload.len(), "Sending order");
        let receipt = match tokio::time::timeout(self.ack_timeout, self.sink.send(&self.topic, payload)).await {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(e)) => {
                error!(error = %e, "Delivery failed");
                return Err(PublishError::Delivery(e));
            }
            Err(_) => {
                error!(timeout = ?self.ack_timeout, "Acknowledgment timed out");
                return Err(PublishError::AckTimeout(self.ack_timeout));
            }
        };

        info!(partition = receipt.partition, offset = receipt.offset, "Order acknowledged");
        self.console.line(&format!("[producer] sent {receipt}"));

        match tokio::time::timeout(self.ack_timeout, self.sink.flush()).await {
            Ok(result) => result.map_err(PublishError::Flush)?,
            Err(_) => return Err(PublishError::AckTimeout(self.ack_timeout)),
        }
        Ok(receipt)
    }
}
