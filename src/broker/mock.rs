//! # Mock Broker
//!
//! In-memory stand-ins for the broker traits, for tests that should not need
//! a running Kafka.
//!
//! - [`MockOrderSink`] answers `send` calls from a queue of expectations and
//!   records every payload it was given.
//! - [`MockReportSource`] hands out messages pushed through its paired
//!   [`ReportFeed`], and lets the test decide when (or whether) the group
//!   assignment happens.
//!
//! # Example
//! ```ignore
//! let sink = MockOrderSink::new();
//! sink.expect_send().return_ok(DeliveryReceipt { partition: 0, offset: 7 });
//!
//! let (source, feed) = MockReportSource::new();
//! feed.push_json(serde_json::json!({"ExecType": "0"}));
//!
//! // hand `sink.clone()` and `source` to the code under test...
//! sink.verify();
//! ```

use crate::broker::{BrokerError, DeliveryReceipt, OrderSink, ReportMessage, ReportSource};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// ORDER SINK
// =============================================================================

/// What the mock does with the next `send`.
enum SendExpectation {
    Ack(DeliveryReceipt),
    Fail(BrokerError),
    /// Never resolves, as if the broker were unreachable.
    Hang,
}

/// A payload the mock sink was asked to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Expectation-driven [`OrderSink`].
///
/// Cloning shares state, so a test can keep one handle for assertions while the
/// code under test owns the other.
#[derive(Clone, Default)]
pub struct MockOrderSink {
    expectations: Arc<Mutex<VecDeque<SendExpectation>>>,
    sent: Arc<Mutex<Vec<SentMessage>>>,
    flushes: Arc<AtomicUsize>,
}

impl MockOrderSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects one `send` call.
    pub fn expect_send(&self) -> SendExpectationBuilder {
        SendExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Every payload passed to `send`, in call order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    /// Panics if queued expectations were never consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all send expectations were met. {} remaining", exps.len());
        }
    }
}

/// Builder for `send` expectations.
pub struct SendExpectationBuilder {
    expectations: Arc<Mutex<VecDeque<SendExpectation>>>,
}

impl SendExpectationBuilder {
    pub fn return_ok(self, receipt: DeliveryReceipt) {
        self.expectations.lock().unwrap().push_back(SendExpectation::Ack(receipt));
    }

    pub fn return_err(self, error: BrokerError) {
        self.expectations.lock().unwrap().push_back(SendExpectation::Fail(error));
    }

    /// The acknowledgment never arrives.
    pub fn never_acknowledge(self) {
        self.expectations.lock().unwrap().push_back(SendExpectation::Hang);
    }
}

#[async_trait]
impl OrderSink for MockOrderSink {
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<DeliveryReceipt, BrokerError> {
        self.sent.lock().unwrap().push(SentMessage {
            topic: topic.to_string(),
            payload,
        });
        let expectation = self.expectations.lock().unwrap().pop_front();
        match expectation {
            Some(SendExpectation::Ack(receipt)) => Ok(receipt),
            Some(SendExpectation::Fail(error)) => Err(error),
            Some(SendExpectation::Hang) => std::future::pending().await,
            None => panic!("Unexpected send to topic '{topic}'"),
        }
    }

    async fn flush(&self) -> Result<(), BrokerError> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// REPORT SOURCE
// =============================================================================

type FeedItem = Result<ReportMessage, BrokerError>;

struct SourceState {
    feed: tokio::sync::Mutex<mpsc::UnboundedReceiver<FeedItem>>,
    assigned: AtomicBool,
    assign_on_subscribe: AtomicBool,
    subscribe_error: Mutex<Option<BrokerError>>,
    subscribed_topic: Mutex<Option<String>>,
    closed: AtomicBool,
}

/// Channel-backed [`ReportSource`].
///
/// By default the group assignment happens as soon as `subscribe` is called.
#[derive(Clone)]
pub struct MockReportSource {
    state: Arc<SourceState>,
}

/// Test-side handle that feeds messages into a [`MockReportSource`].
///
/// Dropping the feed ends the stream (`next_report` returns `Ok(None)`).
pub struct ReportFeed {
    sender: mpsc::UnboundedSender<FeedItem>,
    next_offset: AtomicI64,
}

impl MockReportSource {
    pub fn new() -> (Self, ReportFeed) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let state = SourceState {
            feed: tokio::sync::Mutex::new(receiver),
            assigned: AtomicBool::new(false),
            assign_on_subscribe: AtomicBool::new(true),
            subscribe_error: Mutex::new(None),
            subscribed_topic: Mutex::new(None),
            closed: AtomicBool::new(false),
        };
        let feed = ReportFeed {
            sender,
            next_offset: AtomicI64::new(0),
        };
        (
            Self {
                state: Arc::new(state),
            },
            feed,
        )
    }

    /// Keeps the member unassigned until [`assign`](Self::assign) is called.
    pub fn without_assignment(self) -> Self {
        self.state.assign_on_subscribe.store(false, Ordering::SeqCst);
        self
    }

    /// Makes the next `subscribe` call fail.
    pub fn fail_subscribe(self, error: BrokerError) -> Self {
        *self.state.subscribe_error.lock().unwrap() = Some(error);
        self
    }

    pub fn assign(&self) {
        self.state.assigned.store(true, Ordering::SeqCst);
    }

    pub fn subscribed_topic(&self) -> Option<String> {
        self.state.subscribed_topic.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }
}

impl ReportFeed {
    /// Queues a JSON report on partition 0 with the next offset.
    pub fn push_json(&self, value: serde_json::Value) {
        self.push_raw(value.to_string().into_bytes());
    }

    /// Queues an arbitrary payload on partition 0 with the next offset.
    pub fn push_raw(&self, payload: impl Into<Vec<u8>>) {
        let offset = self.next_offset.fetch_add(1, Ordering::SeqCst);
        self.push(ReportMessage::with_payload(0, offset, payload));
    }

    pub fn push(&self, message: ReportMessage) {
        let _ = self.sender.send(Ok(message));
    }

    /// Makes the next `next_report` call fail.
    pub fn fail(&self, error: BrokerError) {
        let _ = self.sender.send(Err(error));
    }
}

#[async_trait]
impl ReportSource for MockReportSource {
    fn subscribe(&self, topic: &str) -> Result<(), BrokerError> {
        if let Some(error) = self.state.subscribe_error.lock().unwrap().take() {
            return Err(error);
        }
        *self.state.subscribed_topic.lock().unwrap() = Some(topic.to_string());
        if self.state.assign_on_subscribe.load(Ordering::SeqCst) {
            self.assign();
        }
        Ok(())
    }

    fn is_assigned(&self) -> Result<bool, BrokerError> {
        Ok(self.state.assigned.load(Ordering::SeqCst))
    }

    async fn next_report(&self) -> Result<Option<ReportMessage>, BrokerError> {
        let mut feed = self.state.feed.lock().await;
        match feed.recv().await {
            Some(item) => item.map(Some),
            None => Ok(None),
        }
    }

    fn close(&self) {
        self.state.closed.store(true, Ordering::SeqCst);
    }
}
