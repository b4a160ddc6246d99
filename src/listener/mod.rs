//! # Report Listener
//!
//! Consumes the execution-report topic and prints every message until its
//! time budget runs out or it is cancelled.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle --subscribe--> Listening --(time limit | cancelled | stream ended | error)--> Closed
//! ```
//!
//! The current state is published on a `watch` channel ([`ReportListener::state`]).
//!
//! ## Readiness
//!
//! Subscribing only starts the group join; messages produced before the
//! coordinator assigns partitions are not seen (`auto.offset.reset=latest`).
//! While listening, the listener probes the source for an assignment and fires
//! the one-shot `ready` sender the first time one exists. The orchestrator
//! publishes only after that signal (or after its own bounded wait).
//!
//! If the listener stops before it ever became ready, `ready` is dropped
//! unfired and the receiving side sees a closed channel.

pub mod error;

pub use error::*;

use crate::broker::{ReportMessage, ReportSource};
use crate::config::RunConfig;
use crate::console::Console;
use crate::model::{preview, ExecutionReport};
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How often the group assignment is probed until it shows up.
const ASSIGNMENT_PROBE_INTERVAL: Duration = Duration::from_millis(100);

/// Longest raw payload echoed when a message is not JSON.
const RAW_PREVIEW_LIMIT: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Idle,
    Listening,
    Closed,
}

/// Why a listener stopped without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The consume budget elapsed.
    TimeLimit,
    /// The cancellation token fired.
    Cancelled,
    /// The source has nothing more to deliver.
    StreamEnded,
}

/// Result of a listener run that ended cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerOutcome {
    /// Messages received, JSON or not.
    pub reports: usize,
    pub stop_reason: StopReason,
}

pub struct ReportListener<R: ReportSource> {
    source: R,
    topic: String,
    group_id: String,
    brokers: String,
    consume_for: Option<Duration>,
    console: Console,
    state: watch::Sender<ListenerState>,
}

impl<R: ReportSource> ReportListener<R> {
    pub fn new(source: R, config: &RunConfig, console: Console) -> Self {
        let (state, _) = watch::channel(ListenerState::Idle);
        Self {
            source,
            topic: config.exec_topic.clone(),
            group_id: config.group_id.clone(),
            brokers: config.brokers_display(),
            consume_for: config.consume_for,
            console,
            state,
        }
    }

    /// Observes the listener's lifecycle state.
    pub fn state(&self) -> watch::Receiver<ListenerState> {
        self.state.subscribe()
    }

    /// Subscribes and consumes until the budget elapses, `cancel` fires, the
    /// source ends, or the broker returns an error.
    ///
    /// The source is closed before this returns, whatever the outcome.
    pub async fn run(
        self,
        ready: oneshot::Sender<()>,
        cancel: CancellationToken,
    ) -> Result<ListenerOutcome, ListenerError> {
        if let Err(e) = self.source.subscribe(&self.topic) {
            warn!(topic = %self.topic, error = %e, "Subscribe failed");
            self.source.close();
            self.state.send_replace(ListenerState::Closed);
            return Err(ListenerError::Subscribe(e));
        }
        self.state.send_replace(ListenerState::Listening);
        info!(topic = %self.topic, group_id = %self.group_id, budget = ?self.consume_for, "Listener started");
        self.console.line(&format!(
            "[consumer] Listening on topic='{}' brokers={} group_id='{}'",
            self.topic, self.brokers, self.group_id
        ));

        let deadline = self.consume_for.map(|budget| Instant::now() + budget);
        let mut ready = Some(ready);
        let mut probe = tokio::time::interval(ASSIGNMENT_PROBE_INTERVAL);
        probe.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut reports = 0usize;

        let result = loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break Ok(StopReason::Cancelled),

                _ = sleep_until(deadline) => {
                    self.console.line("[consumer] Time limit reached, stopping consumer.");
                    break Ok(StopReason::TimeLimit);
                }

                _ = probe.tick(), if ready.is_some() => match self.source.is_assigned() {
                    Ok(true) => {
                        info!(topic = %self.topic, "Partitions assigned");
                        if let Some(tx) = ready.take() {
                            let _ = tx.send(());
                        }
                    }
                    Ok(false) => debug!("Waiting for partition assignment"),
                    Err(e) => warn!(error = %e, "Assignment probe failed"),
                },

                next = self.source.next_report() => match next {
                    Ok(Some(message)) => {
                        reports += 1;
                        self.print_report(&message);
                    }
                    Ok(None) => break Ok(StopReason::StreamEnded),
                    Err(e) => {
                        warn!(error = %e, "Consume failed");
                        break Err(ListenerError::Receive(e));
                    }
                },
            }
        };

        self.source.close();
        self.state.send_replace(ListenerState::Closed);
        info!(reports, outcome = ?result.as_ref().ok(), "Listener stopped");

        result.map(|stop_reason| ListenerOutcome {
            reports,
            stop_reason,
        })
    }

    fn print_report(&self, message: &ReportMessage) {
        info!(
            partition = message.partition,
            offset = message.offset,
            key = %message.key_display(),
            bytes = message.payload_len(),
            headers = %message.headers_display(),
            "Received message"
        );
        let payload = message.payload.as_deref().unwrap_or_default();
        match ExecutionReport::from_payload(payload) {
            Ok(report) => self.console.block("[consumer] execution_report:", &report.pretty()),
            Err(e) => {
                let raw = preview(payload, RAW_PREVIEW_LIMIT);
                warn!(error = %e, offset = message.offset, "Execution report is not valid JSON");
                self.console.block("[consumer] execution_report (raw):", &raw);
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
