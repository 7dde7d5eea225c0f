// =============================================================================
// Series observers
// =============================================================================
//
// Optional diagnostic hook for the data-loading path. Observers see every
// series that is handed to the indicator engine and every fallback into the
// synthetic generator. Nothing here touches the filesystem.

use serde::Serialize;
use tracing::{debug, warn};

use crate::market_data::bar::TimeSeries;
use crate::market_data::DataSource;

/// Why the live provider was bypassed.
#[derive(Debug, Clone, Serialize)]
pub struct FallbackEvent {
    pub symbol: String,
    pub reason: String,
    /// ISO 8601 timestamp.
    pub at: String,
}

pub trait SeriesObserver: Send + Sync {
    fn on_series_loaded(&self, _series: &TimeSeries, _source: DataSource) {}

    fn on_fallback(&self, _event: &FallbackEvent) {}
}

/// Default observer: structured log lines only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SeriesObserver for TracingObserver {
    fn on_series_loaded(&self, series: &TimeSeries, source: DataSource) {
        if series.is_empty() {
            warn!(symbol = %series.symbol(), source = %source, "series has no bars");
            return;
        }
        debug!(
            symbol = %series.symbol(),
            bars = series.len(),
            first = ?series.dates().first(),
            last = ?series.last_date(),
            source = %source,
            "series loaded"
        );
    }

    fn on_fallback(&self, event: &FallbackEvent) {
        warn!(symbol = %event.symbol, reason = %event.reason, "using synthetic data");
    }
}
