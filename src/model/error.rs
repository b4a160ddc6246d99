//! Error types for order construction.

use thiserror::Error;

/// Errors raised while validating order parameters.
///
/// All of these are detected before any broker client is touched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderError {
    /// Side code outside `{"1", "2"}`.
    #[error("invalid side code '{0}' (expected 1=Buy or 2=Sell)")]
    InvalidSide(String),

    /// Order type code outside `{"1", "2"}`.
    #[error("invalid order type code '{0}' (expected 1=Market or 2=Limit)")]
    InvalidOrderType(String),

    /// Quantity must be strictly positive.
    #[error("invalid order quantity: {0}")]
    InvalidQuantity(i32),

    /// Price must not be negative.
    #[error("invalid price: {0}")]
    InvalidPrice(i32),

    /// A required text field was empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}
