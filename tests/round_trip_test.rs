use order_roundtrip::broker::mock::{MockOrderSink, MockReportSource};
use order_roundtrip::broker::{BrokerError, DeliveryReceipt};
use order_roundtrip::config::RunConfig;
use order_roundtrip::console::Console;
use order_roundtrip::error::HarnessError;
use order_roundtrip::lifecycle::{RoundTrip, RunSummary};
use order_roundtrip::listener::{ListenerError, StopReason};
use order_roundtrip::model::{Instrument, NewOrder, OrderSingle, OrderType, Side, TimeInForce, UserToken};
use order_roundtrip::publisher::PublishError;
use serde_json::json;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;

fn order() -> NewOrder {
    NewOrder::new(
        Instrument::new("BTC_MARKET", "BTC-CNY").unwrap(),
        UserToken::new("investor-token").unwrap(),
        OrderSingle::new(Side::Buy, 100, 40100, OrderType::Limit, TimeInForce::day()).unwrap(),
    )
}

fn config(consume_seconds: u64) -> RunConfig {
    RunConfig {
        consume_for: RunConfig::consume_budget(consume_seconds),
        ..RunConfig::default()
    }
}

/// Shutdown future that never fires.
async fn no_interrupt() {
    std::future::pending::<()>().await
}

/// Happy path: one acknowledged order, reports printed, stop at the time limit.
#[tokio::test(start_paused = true)]
async fn test_round_trip_prints_receipt_and_reports() {
    let sink = MockOrderSink::new();
    sink.expect_send().return_ok(DeliveryReceipt { partition: 0, offset: 17 });
    let (source, feed) = MockReportSource::new();
    feed.push_json(json!({"ExecType": "0", "OrdStatus": "0", "ClOrdID": "1"}));
    feed.push_json(json!({"ExecType": "F", "OrdStatus": "2", "ClOrdID": "1"}));
    let (console, output) = Console::capture();

    let started = Instant::now();
    let summary = RoundTrip::new(config(3), sink.clone(), source.clone(), console)
        .run(&order(), no_interrupt())
        .await
        .expect("round trip succeeds");

    assert_eq!(
        summary,
        RunSummary {
            receipt: DeliveryReceipt { partition: 0, offset: 17 },
            reports: 2,
            stop_reason: StopReason::TimeLimit,
        }
    );
    assert!(started.elapsed() <= Duration::from_secs(3 + 5));

    assert_eq!(output.count_lines_starting_with("[producer] sent partition=0 offset=17"), 1);
    assert_eq!(output.count_lines_starting_with("[producer] sent"), 1);
    assert_eq!(output.count_lines_starting_with("[consumer] execution_report:"), 2);
    assert_eq!(output.count_lines_starting_with("[consumer] Listening on topic='execution_report'"), 1);
    assert_eq!(output.count_lines_starting_with("[consumer] Time limit reached"), 1);

    let sent = sink.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].topic, "new_orders");
    assert_eq!(NewOrder::from_json_slice(&sent[0].payload).unwrap(), order());
    sink.verify();
    assert!(source.is_closed());
    drop(feed);
}

/// The broker rejects the order: the run fails and the listener is shut down.
#[tokio::test]
async fn test_publish_failure_fails_run_and_closes_listener() {
    let sink = MockOrderSink::new();
    sink.expect_send().return_err(BrokerError::Transport("all brokers down".into()));
    let (source, _feed) = MockReportSource::new();
    let (console, output) = Console::capture();

    let err = RoundTrip::new(config(60), sink, source.clone(), console)
        .run(&order(), no_interrupt())
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::Publish(PublishError::Delivery(_))));
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("all brokers down"));
    assert_eq!(output.count_lines_starting_with("[producer] sent"), 0);
    assert!(source.is_closed());
}

/// No acknowledgment ever arrives: the run fails after the ack timeout, not later.
#[tokio::test(start_paused = true)]
async fn test_unacknowledged_publish_is_bounded_by_ack_timeout() {
    let sink = MockOrderSink::new();
    sink.expect_send().never_acknowledge();
    let (source, _feed) = MockReportSource::new();
    let config = RunConfig {
        ack_timeout: Duration::from_secs(4),
        ..config(0)
    };

    let started = Instant::now();
    let err = RoundTrip::new(config, sink, source.clone(), Console::capture().0)
        .run(&order(), no_interrupt())
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::Publish(PublishError::AckTimeout(_))));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(source.is_closed());
}

/// A listener that cannot subscribe fails the run before anything is published.
#[tokio::test]
async fn test_listener_subscribe_failure_is_surfaced() {
    let sink = MockOrderSink::new();
    let (source, _feed) = MockReportSource::new();
    let source = source.fail_subscribe(BrokerError::Transport("group coordinator unavailable".into()));

    let err = RoundTrip::new(config(60), sink.clone(), source, Console::capture().0)
        .run(&order(), no_interrupt())
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::Listener(ListenerError::Subscribe(_))));
    assert!(sink.sent().is_empty());
}

/// A receive error after the order went out still fails the run.
#[tokio::test(start_paused = true)]
async fn test_listener_receive_error_after_publish_is_surfaced() {
    let sink = MockOrderSink::new();
    sink.expect_send().return_ok(DeliveryReceipt { partition: 1, offset: 3 });
    let (source, feed) = MockReportSource::new();

    let run_sink = sink.clone();
    let run = tokio::spawn(async move {
        RoundTrip::new(config(60), run_sink, source, Console::capture().0)
            .run(&order(), no_interrupt())
            .await
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(sink.sent().len(), 1);
    assert!(!run.is_finished());

    feed.fail(BrokerError::Transport("connection reset".into()));
    let err = run.await.unwrap().unwrap_err();

    assert!(matches!(err, HarnessError::Listener(ListenerError::Receive(_))));
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("connection reset"));
}

/// A receive error before the group assignment fails the run with nothing published.
#[tokio::test]
async fn test_listener_receive_error_before_ready_publishes_nothing() {
    let sink = MockOrderSink::new();
    let (source, feed) = MockReportSource::new();
    let source = source.without_assignment();
    feed.fail(BrokerError::Transport("connection reset".into()));

    let err = RoundTrip::new(config(60), sink.clone(), source, Console::capture().0)
        .run(&order(), no_interrupt())
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::Listener(ListenerError::Receive(_))));
    assert!(sink.sent().is_empty());
}

/// Unreachable broker: no assignment and no acknowledgment. The run still fails
/// within the ack timeout rather than the readiness wait plus the ack timeout.
#[tokio::test(start_paused = true)]
async fn test_unreachable_broker_fails_within_ack_timeout() {
    let sink = MockOrderSink::new();
    sink.expect_send().never_acknowledge();
    let (source, _feed) = MockReportSource::new();
    let source = source.without_assignment();
    let (console, output) = Console::capture();

    let started = Instant::now();
    let err = RoundTrip::new(RunConfig::default(), sink.clone(), source.clone(), console)
        .run(&order(), no_interrupt())
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::Publish(PublishError::AckTimeout(d)) if d == Duration::from_secs(10)));
    assert!(started.elapsed() <= Duration::from_secs(10));
    assert_eq!(sink.sent().len(), 1);
    assert_eq!(output.count_lines_starting_with("[producer] sent"), 0);
    assert!(source.is_closed());
}

/// A readiness wait configured longer than the ack timeout is capped by it.
#[tokio::test(start_paused = true)]
async fn test_long_ready_timeout_is_capped_by_ack_timeout() {
    let sink = MockOrderSink::new();
    sink.expect_send().never_acknowledge();
    let (source, _feed) = MockReportSource::new();
    let source = source.without_assignment();
    let config = RunConfig {
        ready_timeout: Duration::from_secs(30),
        ack_timeout: Duration::from_secs(4),
        ..config(60)
    };

    let started = Instant::now();
    let err = RoundTrip::new(config, sink, source, Console::capture().0)
        .run(&order(), no_interrupt())
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::Publish(PublishError::AckTimeout(_))));
    assert!(started.elapsed() <= Duration::from_secs(4));
}

/// `--consume-seconds 0` keeps listening until interrupted; the interrupt is a clean stop.
#[tokio::test(start_paused = true)]
async fn test_unbounded_consume_stops_on_interrupt() {
    let sink = MockOrderSink::new();
    sink.expect_send().return_ok(DeliveryReceipt { partition: 0, offset: 0 });
    let (source, feed) = MockReportSource::new();
    let (interrupt_tx, interrupt_rx) = oneshot::channel::<()>();
    let (console, output) = Console::capture();

    let run = tokio::spawn(async move {
        RoundTrip::new(config(0), sink, source, console)
            .run(&order(), async {
                let _ = interrupt_rx.await;
            })
            .await
    });

    tokio::time::sleep(Duration::from_secs(6 * 3600)).await;
    feed.push_json(json!({"ExecType": "0"}));
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!run.is_finished());

    interrupt_tx.send(()).unwrap();
    let summary = run.await.unwrap().expect("interrupt is a normal shutdown");

    assert_eq!(summary.stop_reason, StopReason::Cancelled);
    assert_eq!(summary.reports, 1);
    assert_eq!(output.count_lines_starting_with("[consumer] execution_report:"), 1);
    assert_eq!(output.count_lines_starting_with("[consumer] Time limit reached"), 0);
}

/// Without a group assignment the order still goes out after the readiness timeout.
#[tokio::test(start_paused = true)]
async fn test_missing_assignment_publishes_after_ready_timeout() {
    let sink = MockOrderSink::new();
    sink.expect_send().return_ok(DeliveryReceipt { partition: 0, offset: 5 });
    let (source, _feed) = MockReportSource::new();
    let source = source.without_assignment();
    let config = RunConfig {
        ready_timeout: Duration::from_secs(2),
        ..config(5)
    };

    let started = Instant::now();
    let summary = RoundTrip::new(config, sink.clone(), source, Console::capture().0)
        .run(&order(), no_interrupt())
        .await
        .unwrap();

    assert_eq!(summary.stop_reason, StopReason::TimeLimit);
    assert_eq!(sink.sent().len(), 1);
    assert!(started.elapsed() >= Duration::from_secs(5));
    assert!(started.elapsed() <= Duration::from_secs(5 + 5));
}

/// The report stream ending before any assignment means there is nobody to listen.
#[tokio::test]
async fn test_listener_ending_before_ready_fails_run() {
    let sink = MockOrderSink::new();
    let (source, feed) = MockReportSource::new();
    let source = source.without_assignment();
    drop(feed);

    let err = RoundTrip::new(config(60), sink.clone(), source, Console::capture().0)
        .run(&order(), no_interrupt())
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::ListenerNotReady(StopReason::StreamEnded)));
    assert!(sink.sent().is_empty());
}
