//! # Run Lifecycle & Orchestration
//!
//! The publisher and the listener are simple on their own; the ordering between
//! them is where the harness can go wrong. This module owns that ordering.
//!
//! **Key Responsibilities:**
//! 1. **Listener Startup** - spawn the listener task before anything is published
//! 2. **Readiness** - publish only once the consumer group has an assignment,
//!    or after a bounded wait
//! 3. **Failure Propagation** - a listener error or panic fails the run
//! 4. **Shutdown** - cancel the listener on publish failure, interrupt, or overrun
//! 5. **Observability Setup** - initialize tracing
//!
//! ## The Round Trip
//!
//! ```text
//! main                              listener task
//!  |-- spawn ----------------------> subscribe, print "Listening on ..."
//!  |<-- ready (partitions assigned)-|
//!  |-- publish, print "sent ..."     |
//!  |                                 | print each execution report
//!  |<-- JoinHandle result ----------| time limit / cancelled / error
//! ```
//!
//! # Main Components
//!
//! - [`RoundTrip`] - runs one publish-and-listen cycle and returns a [`RunSummary`]
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod round_trip;
pub mod tracing;

pub use round_trip::*;
pub use self::tracing::setup_tracing;
