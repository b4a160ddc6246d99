//! # Order Round-Trip Harness
//!
//! > **Publish one order to Kafka, then watch what the exchange says back.**
//!
//! This crate is a test client for a Kafka-fronted order gateway. It sends a
//! single `NewOrder` message to the orders topic and, concurrently, prints every
//! execution report that arrives on the report topic for a bounded time.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Two tasks, no shared state
//!
//! The main flow publishes; a spawned task listens. They coordinate only through
//! a one-shot readiness signal, a `CancellationToken` and the listener's
//! `JoinHandle`. Each side owns its own broker client.
//!
//! ### Ready before publish
//!
//! The listener joins its consumer group with `auto.offset.reset=latest`, so a
//! report produced before the group assignment would be missed. The order is
//! published only after the listener reports an assignment (or after a bounded
//! wait, with a warning).
//!
//! ### Failures are observed
//!
//! A listener that fails to subscribe or loses its connection fails the run.
//! Nothing is retried.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Messages ([`model`])
//! - **Role**: The order wire format and the opaque execution report.
//! - **Key items**: [`NewOrder`](model::NewOrder), [`Side`](model::Side), [`OrderType`](model::OrderType).
//!
//! ### 2. The Transport ([`broker`])
//! - **Role**: The two broker seams, their rdkafka implementations and in-memory mocks.
//! - **Key items**: [`OrderSink`](broker::OrderSink), [`ReportSource`](broker::ReportSource), [`broker::mock`].
//!
//! ### 3. The Two Halves ([`publisher`], [`listener`])
//! - **Role**: Send-and-confirm, and the time-bounded report loop.
//! - **Key items**: [`OrderPublisher`](publisher::OrderPublisher), [`ReportListener`](listener::ReportListener).
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! - **Role**: Sequencing, cancellation and tracing setup.
//! - **Key items**: [`RoundTrip`](lifecycle::RoundTrip), [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### 5. The Edges ([`config`], [`console`], [`error`])
//! - **Role**: CLI parsing and validation, the stdout console, and the run-level error.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Against a local broker, listen for 30 seconds
//! order-roundtrip --brokers localhost:9092 --consume-seconds 30
//!
//! # A market sell, listening until Ctrl-C
//! order-roundtrip --side 2 --ordtype 1 --qty 5 --consume-seconds 0
//! ```
//!
//! ### Running Tests
//!
//! No broker is needed; the tests run against [`broker::mock`].
//!
//! ```bash
//! cargo test
//! ```

pub mod broker;
pub mod config;
pub mod console;
pub mod error;
pub mod lifecycle;
pub mod listener;
pub mod model;
pub mod publisher;
