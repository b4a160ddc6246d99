use clap::Parser;
use order_roundtrip::broker::kafka::{KafkaOrderSink, KafkaReportSource};
use order_roundtrip::config::Cli;
use order_roundtrip::console::Console;
use order_roundtrip::error::HarnessError;
use order_roundtrip::lifecycle::{setup_tracing, RoundTrip, RunSummary};
use std::process::ExitCode;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; flags and the real environment still apply.
    dotenvy::dotenv().ok();
    setup_tracing();

    match run(Cli::parse()).await {
        Ok(summary) => {
            info!(
                partition = summary.receipt.partition,
                offset = summary.receipt.offset,
                reports = summary.reports,
                "Done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<RunSummary, HarnessError> {
    let (config, order) = cli.into_run()?;
    info!(brokers = %config.brokers_display(), "Starting order round trip");

    let sink = KafkaOrderSink::new(&config.brokers, config.ack_timeout).map_err(HarnessError::Startup)?;
    let source = KafkaReportSource::new(&config.brokers, &config.group_id).map_err(HarnessError::Startup)?;

    RoundTrip::new(config, sink, source, Console::stdout())
        .run(&order, interrupted())
        .await
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
