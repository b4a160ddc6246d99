//! Execution reports as seen by the harness: opaque JSON.

use serde::{Deserialize, Serialize};

/// A decoded execution report.
///
/// The harness never looks inside. Whatever the exchange gateway sent is kept
/// as a [`serde_json::Value`] and echoed back with indentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionReport(serde_json::Value);

impl ExecutionReport {
    /// Decodes a UTF-8 JSON payload.
    pub fn from_payload(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload).map(Self)
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Two-space indented rendering.
    pub fn pretty(&self) -> String {
        // Serializing a `Value` cannot fail; fall back to the compact form anyway.
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

impl From<serde_json::Value> for ExecutionReport {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Truncated, lossy UTF-8 preview of a raw payload for logs.
///
/// A `max` of zero falls back to 256 bytes.
pub fn preview(bytes: &[u8], max: usize) -> String {
    let max = if max == 0 { 256 } else { max };
    if bytes.len() <= max {
        return String::from_utf8_lossy(bytes).into_owned();
    }
    let mut text = String::from_utf8_lossy(&bytes[..max]).into_owned();
    text.push_str("...(truncated)");
    text
}
