//! Error types for run configuration.

use crate::model::OrderError;
use thiserror::Error;

/// Errors raised while turning command-line input into a run configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The broker list was empty after splitting and trimming.
    #[error("no brokers configured")]
    NoBrokers,

    /// A required setting was blank.
    #[error("{0} must not be empty")]
    EmptyValue(&'static str),

    /// The order parameters did not validate.
    #[error("invalid order: {0}")]
    Order(#[from] OrderError),
}
