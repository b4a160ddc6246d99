use crate::broker::{DeliveryReceipt, OrderSink, ReportSource};
use crate::config::RunConfig;
use crate::console::Console;
use crate::error::HarnessError;
use crate::listener::{ListenerError, ListenerOutcome, ReportListener, StopReason};
use crate::model::NewOrder;
use crate::publisher::{OrderPublisher, PublishError};
use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// How long a cancelled listener gets to close before it is aborted.
pub const CLOSE_GRACE: Duration = Duration::from_secs(2);

type ListenerHandle = JoinHandle<Result<ListenerOutcome, ListenerError>>;

/// What a completed run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Where the order landed.
    pub receipt: DeliveryReceipt,
    /// Execution reports printed by the listener.
    pub reports: usize,
    pub stop_reason: StopReason,
}

/// Drives one publish-and-listen round trip.
///
/// `RoundTrip` is responsible for:
/// - **Task Management**: spawning the listener and always observing its result
/// - **Sequencing**: publishing only once the listener is ready (or the wait gave up)
/// - **Shutdown**: cancelling the listener on failure, interrupt, or an overrun join
///
/// # Example
///
/// ```ignore
/// let sink = KafkaOrderSink::new(&config.brokers, config.ack_timeout)?;
/// let source = KafkaReportSource::new(&config.brokers, &config.group_id)?;
///
/// let summary = RoundTrip::new(config, sink, source, Console::stdout())
///     .run(&order, tokio::signal::ctrl_c())
///     .await?;
/// ```
pub struct RoundTrip<S, R> {
    config: RunConfig,
    sink: S,
    source: R,
    console: Console,
}

impl<S, R> RoundTrip<S, R>
where
    S: OrderSink + 'static,
    R: ReportSource + 'static,
{
    /// Takes ownership of both broker clients; each is dropped by the side that uses it.
    pub fn new(config: RunConfig, sink: S, source: R, console: Console) -> Self {
        Self {
            config,
            sink,
            source,
            console,
        }
    }

    /// Runs the round trip to completion.
    ///
    /// `shutdown` resolving while the listener is being joined (e.g. Ctrl-C)
    /// stops the listener and counts as a normal end of the run.
    pub async fn run<F>(self, order: &NewOrder, shutdown: F) -> Result<RunSummary, HarnessError>
    where
        F: Future,
    {
        let RoundTrip {
            config,
            sink,
            source,
            console,
        } = self;

        // =====================================================================
        // Step 1: Start the listener
        // =====================================================================

        let listener = ReportListener::new(source, &config, console.clone());
        let cancel = CancellationToken::new();
        let (ready_tx, ready_rx) = oneshot::channel();
        let mut handle = tokio::spawn(listener.run(ready_tx, cancel.clone()));

        // =====================================================================
        // Step 2: Wait until the listener can see new messages
        // =====================================================================

        // Readiness and publish share one ack-timeout budget, so an unreachable
        // broker fails the run within the ack timeout.
        let publish_deadline = Instant::now() + config.ack_timeout;
        let ready_wait = config.ready_timeout.min(config.ack_timeout);

        match tokio::time::timeout(ready_wait, ready_rx).await {
            Ok(Ok(())) => info!("Listener ready"),
            Ok(Err(_)) => {
                // The sender is dropped only when the listener has returned.
                let outcome = collect(handle.await)?;
                error!(reason = ?outcome.stop_reason, "Listener stopped before it was ready");
                return Err(HarnessError::ListenerNotReady(outcome.stop_reason));
            }
            Err(_) => warn!(
                timeout = ?ready_wait,
                "No partition assignment yet, publishing anyway"
            ),
        }

        // =====================================================================
        // Step 3: Publish the order
        // =====================================================================

        let publisher = OrderPublisher::new(sink, &config, console);
        let published = tokio::time::timeout_at(publish_deadline, publisher.publish(order))
            .await
            .unwrap_or(Err(PublishError::AckTimeout(config.ack_timeout)));
        let receipt = match published {
            Ok(receipt) => receipt,
            Err(e) => {
                error!(error = %e, "Publish failed, stopping listener");
                if let Err(stop_err) = stop(&mut handle, &cancel).await {
                    warn!(error = %stop_err, "Listener did not stop cleanly");
                }
                return Err(e.into());
            }
        };

        // =====================================================================
        // Step 4: Join the listener
        // =====================================================================

        let join_budget = config.join_budget();
        let outcome = tokio::select! {
            joined = &mut handle => collect(joined)?,
            _ = shutdown => {
                info!("Interrupted, stopping listener");
                stop(&mut handle, &cancel).await?
            }
            _ = sleep_for(join_budget) => {
                warn!(budget = ?join_budget, "Listener overran its budget, cancelling");
                stop(&mut handle, &cancel).await?
            }
        };

        info!(
            partition = receipt.partition,
            offset = receipt.offset,
            reports = outcome.reports,
            reason = ?outcome.stop_reason,
            "Round trip complete"
        );
        Ok(RunSummary {
            receipt,
            reports: outcome.reports,
            stop_reason: outcome.stop_reason,
        })
    }
}

/// Cancels the listener and waits up to [`CLOSE_GRACE`] for it, aborting it after that.
async fn stop(handle: &mut ListenerHandle, cancel: &CancellationToken) -> Result<ListenerOutcome, HarnessError> {
    cancel.cancel();
    match tokio::time::timeout(CLOSE_GRACE, &mut *handle).await {
        Ok(joined) => collect(joined),
        Err(_) => {
            handle.abort();
            Err(HarnessError::ListenerHung(CLOSE_GRACE))
        }
    }
}

fn collect(
    joined: Result<Result<ListenerOutcome, ListenerError>, JoinError>,
) -> Result<ListenerOutcome, HarnessError> {
    Ok(joined??)
}

async fn sleep_for(budget: Option<Duration>) {
    match budget {
        Some(budget) => tokio::time::sleep(budget).await,
        None => std::future::pending().await,
    }
}
