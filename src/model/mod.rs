//! Pure data structures: the outgoing order and the incoming reports.

pub mod error;
pub mod order;
pub mod report;

pub use error::*;
pub use order::*;
pub use report::*;
