//! The synthetic "new order single" published by the harness.
//!
//! # Wire Format
//! The struct layout mirrors the JSON object the order gateway consumes:
//!
//! ```text
//! {
//!   "instrument": { "security_exchange": "BTC_MARKET", "symbol": "BTC-CNY" },
//!   "user_token": "...",
//!   "new_order_single": {
//!     "side": "1", "order_qty": 100, "price": 40100,
//!     "order_type": "2", "time_in_force": "0"
//!   }
//! }
//! ```
//!
//! Enumerated fields travel as FIX code strings, quantities as integers.

use crate::model::OrderError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side as a FIX `Side` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "1")]
    Buy,
    #[serde(rename = "2")]
    Sell,
}

impl Side {
    /// Parses a side code. Only `"1"` and `"2"` are accepted.
    pub fn from_code(code: &str) -> Result<Self, OrderError> {
        match code {
            "1" => Ok(Self::Buy),
            "2" => Ok(Self::Sell),
            other => Err(OrderError::InvalidSide(other.to_string())),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Buy => "1",
            Self::Sell => "2",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Order type as a FIX `OrdType` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "1")]
    Market,
    #[serde(rename = "2")]
    Limit,
}

impl OrderType {
    /// Parses an order type code. Only `"1"` and `"2"` are accepted.
    pub fn from_code(code: &str) -> Result<Self, OrderError> {
        match code {
            "1" => Ok(Self::Market),
            "2" => Ok(Self::Limit),
            other => Err(OrderError::InvalidOrderType(other.to_string())),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Market => "1",
            Self::Limit => "2",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// FIX `TimeInForce` code, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeInForce(String);

impl TimeInForce {
    pub const DAY: &'static str = "0";

    pub fn new(code: impl Into<String>) -> Result<Self, OrderError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(OrderError::EmptyField("time_in_force"));
        }
        Ok(Self(code))
    }

    pub fn day() -> Self {
        Self(Self::DAY.to_string())
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

/// Opaque investor credential.
///
/// Serialized verbatim, but never printed through `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserToken(String);

impl UserToken {
    pub fn new(token: impl Into<String>) -> Result<Self, OrderError> {
        let token = token.into();
        if token.is_empty() {
            return Err(OrderError::EmptyField("user_token"));
        }
        Ok(Self(token))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserToken([REDACTED])")
    }
}

/// Exchange and symbol the order is routed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub security_exchange: String,
    pub symbol: String,
}

impl Instrument {
    pub fn new(
        security_exchange: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Result<Self, OrderError> {
        let security_exchange = security_exchange.into();
        let symbol = symbol.into();
        if security_exchange.trim().is_empty() {
            return Err(OrderError::EmptyField("security_exchange"));
        }
        if symbol.trim().is_empty() {
            return Err(OrderError::EmptyField("symbol"));
        }
        Ok(Self {
            security_exchange,
            symbol,
        })
    }
}

/// The order details block (`new_order_single` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSingle {
    pub side: Side,
    pub order_qty: i32,
    pub price: i32,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
}

impl OrderSingle {
    pub fn new(
        side: Side,
        order_qty: i32,
        price: i32,
        order_type: OrderType,
        time_in_force: TimeInForce,
    ) -> Result<Self, OrderError> {
        if order_qty <= 0 {
            return Err(OrderError::InvalidQuantity(order_qty));
        }
        if price < 0 {
            return Err(OrderError::InvalidPrice(price));
        }
        Ok(Self {
            side,
            order_qty,
            price,
            order_type,
            time_in_force,
        })
    }
}

/// The full order message. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub instrument: Instrument,
    pub user_token: UserToken,
    pub new_order_single: OrderSingle,
}

impl NewOrder {
    pub fn new(instrument: Instrument, user_token: UserToken, new_order_single: OrderSingle) -> Self {
        Self {
            instrument,
            user_token,
            new_order_single,
        }
    }

    /// Encodes the order as UTF-8 JSON.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Indented rendering used for the console echo.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
