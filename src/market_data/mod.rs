// =============================================================================
// Market Data Module
// =============================================================================
//
// Daily OHLCV series, the live provider seam, the deterministic synthetic
// fallback, and the service that chooses between them.

pub mod bar;
pub mod observer;
pub mod provider;
pub mod service;
pub mod synthetic;
pub mod timeframe;

pub use bar::{Bar, TimeSeries};
pub use observer::{FallbackEvent, SeriesObserver};
pub use provider::MarketDataProvider;
pub use service::{IndexSnapshot, MarketDataService};

use serde::Serialize;

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Synthetic,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// Upper-case `raw` and default it to the NSE (`.NS`) unless it already names
/// NSE or BSE (`.BO`).
pub fn normalize_symbol(raw: &str) -> String {
    let symbol = raw.trim().to_uppercase();
    if symbol.ends_with(".NS") || symbol.ends_with(".BO") {
        symbol
    } else {
        format!("{symbol}.NS")
    }
}
