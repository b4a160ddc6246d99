//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter that
//! writes to **stderr**. Stdout is reserved for the `[producer]` / `[consumer]`
//! console lines, so the two streams can be redirected separately.
//!
//! The filter comes from `RUST_LOG` and defaults to `info`.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Default: lifecycle events and per-message metadata
//! order-roundtrip --consume-seconds 30
//!
//! # Full order payload and assignment probing
//! RUST_LOG=debug order-roundtrip
//!
//! # librdkafka-side details stay quiet unless asked for
//! RUST_LOG=order_roundtrip=debug,rdkafka=trace order-roundtrip
//!
//! # Only the console output
//! order-roundtrip 2>/dev/null
//! ```
//!
//! ## What Gets Traced
//!
//! - **Publisher**: send, acknowledgment (partition/offset), delivery failures,
//!   inside a `publish{topic=...}` span
//! - **Listener**: start, partition assignment, one event per message with
//!   partition, offset, key, size and header names, stop reason
//! - **Orchestrator**: readiness, interrupts, and the final summary
//!
//! With `RUST_LOG=info`:
//!
//! ```text
//! INFO Listener started topic="execution_report" group_id="rust-kafka-client" budget=Some(60s)
//! INFO Partitions assigned topic="execution_report"
//! INFO Listener ready
//! INFO publish: Sending order topic="new_orders" bytes=231
//! INFO publish: Order acknowledged topic="new_orders" partition=0 offset=17
//! INFO Received message partition=0 offset=52 key=- bytes=412 headers=-
//! ```
use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
