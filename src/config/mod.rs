//! Run configuration.
//!
//! [`Cli`] is what the user types (flags with environment fallbacks);
//! [`RunConfig`] is the validated, read-only view the rest of the crate uses.

pub mod cli;
pub mod error;

pub use cli::*;
pub use error::*;

use std::time::Duration;

/// Extra time the main flow waits for the listener beyond its consume budget.
pub const JOIN_GRACE: Duration = Duration::from_secs(5);

/// Broker, topic and timing settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub brokers: Vec<String>,
    pub orders_topic: String,
    pub exec_topic: String,
    pub group_id: String,
    /// How long the listener consumes; `None` means until cancelled.
    pub consume_for: Option<Duration>,
    /// Upper bound on the wait for the publish acknowledgment.
    pub ack_timeout: Duration,
    /// Upper bound on the wait for the listener's group assignment.
    pub ready_timeout: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            brokers: vec!["localhost:9092".to_string()],
            orders_topic: "new_orders".to_string(),
            exec_topic: "execution_report".to_string(),
            group_id: "rust-kafka-client".to_string(),
            consume_for: Some(Duration::from_secs(60)),
            ack_timeout: Duration::from_secs(10),
            ready_timeout: Duration::from_secs(1),
        }
    }
}

impl RunConfig {
    /// Splits a comma-separated broker list, dropping blank entries.
    pub fn parse_brokers(raw: &str) -> Result<Vec<String>, ConfigError> {
        let brokers: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(String::from)
            .collect();
        if brokers.is_empty() {
            return Err(ConfigError::NoBrokers);
        }
        Ok(brokers)
    }

    /// `0` seconds means no time limit.
    pub fn consume_budget(seconds: u64) -> Option<Duration> {
        (seconds > 0).then(|| Duration::from_secs(seconds))
    }

    /// How long the main flow waits for the listener to finish.
    pub fn join_budget(&self) -> Option<Duration> {
        self.consume_for.map(|d| d + JOIN_GRACE)
    }

    /// Broker list as printed on the console, e.g. `[host1:9092, host2:9092]`.
    pub fn brokers_display(&self) -> String {
        format!("[{}]", self.brokers.join(", "))
    }
}
