//! # Kafka Transport
//!
//! `rdkafka`-backed implementations of [`OrderSink`] and [`ReportSource`].
//!
//! Each struct owns exactly one librdkafka client. Dropping it closes the
//! client, which is how the publisher and listener release their connections
//! at the end of their own scope.

use crate::broker::{BrokerError, DeliveryReceipt, OrderSink, ReportMessage, ReportSource};
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::{BorrowedMessage, Headers, Message};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use std::time::Duration;
use tracing::{debug, info};

/// Producer for the order topic.
///
/// Configured with `acks=all` and a 10ms linger; librdkafka's own message
/// timeout is set to the acknowledgment timeout so a delivery never outlives
/// the caller's wait.
pub struct KafkaOrderSink {
    producer: FutureProducer,
    ack_timeout: Duration,
}

impl KafkaOrderSink {
    pub fn new(brokers: &[String], ack_timeout: Duration) -> Result<Self, BrokerError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers.join(","))
            .set("acks", "all")
            .set("linger.ms", "10")
            .set("message.timeout.ms", ack_timeout.as_millis().to_string())
            .create()
            .map_err(|source| BrokerError::Startup {
                role: "producer",
                source,
            })?;
        info!(brokers = %brokers.join(","), "Kafka producer created");
        Ok(Self {
            producer,
            ack_timeout,
        })
    }
}

#[async_trait]
impl OrderSink for KafkaOrderSink {
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<DeliveryReceipt, BrokerError> {
        let record = FutureRecord::<(), [u8]>::to(topic).payload(payload.as_slice());
        match self.producer.send(record, Timeout::After(self.ack_timeout)).await {
            Ok((partition, offset)) => Ok(DeliveryReceipt { partition, offset }),
            Err((err, _unsent)) => Err(BrokerError::Kafka(err)),
        }
    }

    async fn flush(&self) -> Result<(), BrokerError> {
        // `flush` blocks the calling thread until the queue drains.
        let producer = self.producer.clone();
        let timeout = self.ack_timeout;
        tokio::task::spawn_blocking(move || producer.flush(Timeout::After(timeout)))
            .await
            .map_err(|e| BrokerError::Transport(format!("flush task failed: {e}")))?
            .map_err(BrokerError::from)
    }
}

/// Group member on the execution-report topic.
///
/// `auto.offset.reset=latest` and auto commit: only messages produced after
/// the group assignment are seen, offsets are committed in the background.
pub struct KafkaReportSource {
    consumer: StreamConsumer,
}

impl KafkaReportSource {
    pub fn new(brokers: &[String], group_id: &str) -> Result<Self, BrokerError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers.join(","))
            .set("group.id", group_id)
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", "latest")
            .set("session.timeout.ms", "30000")
            .set("heartbeat.interval.ms", "3000")
            .create()
            .map_err(|source| BrokerError::Startup {
                role: "consumer",
                source,
            })?;
        info!(brokers = %brokers.join(","), group_id, "Kafka consumer created");
        Ok(Self { consumer })
    }
}

#[async_trait]
impl ReportSource for KafkaReportSource {
    fn subscribe(&self, topic: &str) -> Result<(), BrokerError> {
        self.consumer.subscribe(&[topic])?;
        Ok(())
    }

    fn is_assigned(&self) -> Result<bool, BrokerError> {
        Ok(self.consumer.assignment()?.count() > 0)
    }

    async fn next_report(&self) -> Result<Option<ReportMessage>, BrokerError> {
        let message = self.consumer.recv().await?;
        Ok(Some(to_owned_report(&message)))
    }

    fn close(&self) {
        debug!("Leaving consumer group");
        self.consumer.unsubscribe();
    }
}

fn to_owned_report(message: &BorrowedMessage<'_>) -> ReportMessage {
    let headers = message
        .headers()
        .map(|headers| {
            headers
                .iter()
                .map(|header| (header.key.to_string(), header.value.map_or(0, <[u8]>::len)))
                .collect()
        })
        .unwrap_or_default();

    ReportMessage {
        partition: message.partition(),
        offset: message.offset(),
        key: message.key().map(<[u8]>::to_vec),
        headers,
        payload: message.payload().map(<[u8]>::to_vec),
    }
}
