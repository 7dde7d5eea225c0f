// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators served by the API.
// Every function returns a series aligned to its input, with `None` wherever
// the trailing window is not yet full or the value is not finite.

pub mod bollinger;
pub mod ema;
pub mod engine;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use engine::{compute, compute_by_name, IndicatorKind, IndicatorResultSet, DATE_KEY};
