// =============================================================================
// Core error types
// =============================================================================
//
// Errors raised by the pure computation layer. Insufficient history and a
// degenerate RSI ratio are never errors: they surface as `None` entries in the
// affected indicator series.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The synthetic generator was asked for a range whose start is after its end.
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// A timeframe such as `6m` had a recognised unit but an unusable count.
    #[error("invalid timeframe '{0}'")]
    InvalidTimeframe(String),
}
