// =============================================================================
// Market Data Service — live fetch with synthetic fallback
// =============================================================================
//
// The only place that talks to the live provider. Every failure mode of the
// provider (transport error, bad payload, empty answer, timeout) falls
// straight through to the synthetic generator: callers always get a series
// unless the request itself is invalid.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::IndexListing;
use crate::error::CoreError;
use crate::market_data::bar::{ReturnsPolicy, TimeSeries};
use crate::market_data::observer::{FallbackEvent, SeriesObserver, TracingObserver};
use crate::market_data::provider::MarketDataProvider;
use crate::market_data::timeframe::Timeframe;
use crate::market_data::{synthetic, DataSource};

/// Calendar days fetched for an index snapshot; enough to span a long weekend.
const SNAPSHOT_LOOKBACK_DAYS: i64 = 10;

/// A series together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: TimeSeries,
    pub source: DataSource,
}

/// Latest move of a market index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSnapshot {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub high: f64,
    pub low: f64,
}

pub struct MarketDataService {
    /// `None` disables live data entirely.
    provider: Option<Arc<dyn MarketDataProvider>>,
    observers: Vec<Arc<dyn SeriesObserver>>,
    fetch_timeout: Duration,
}

impl MarketDataService {
    pub fn new(provider: Option<Arc<dyn MarketDataProvider>>, fetch_timeout: Duration) -> Self {
        Self {
            provider,
            observers: vec![Arc::new(TracingObserver)],
            fetch_timeout,
        }
    }

    /// Register an additional observer.
    pub fn with_observer(mut self, observer: Arc<dyn SeriesObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn live_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Load `symbol` over the lookback described by `timeframe`, ending today.
    pub async fn load(&self, symbol: &str, timeframe: &str) -> Result<LoadedSeries, CoreError> {
        let timeframe = Timeframe::parse(timeframe)?;
        let today = chrono::Local::now().date_naive();
        let (start, end) = timeframe.range_ending(today);
        debug!(symbol = %symbol, lookback_days = timeframe.days(), "loading series");
        self.load_range(symbol, start, end).await
    }

    /// Load `symbol` over `[start, end]`.
    ///
    /// The symbol is normalised first (`TCS` becomes `TCS.NS`); the synthetic
    /// fallback is seeded from the normalised form.
    pub async fn load_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<LoadedSeries, CoreError> {
        if start > end {
            return Err(CoreError::InvalidDateRange { start, end });
        }
        let symbol = super::normalize_symbol(symbol);

        let loaded = match &self.provider {
            None => {
                debug!(symbol = %symbol, "live data disabled, generating synthetic series");
                LoadedSeries {
                    series: synthetic::generate(&symbol, start, end)?,
                    source: DataSource::Synthetic,
                }
            }
            Some(provider) => match self.fetch_live(provider.as_ref(), &symbol, start, end).await {
                Ok(series) => LoadedSeries {
                    series,
                    source: DataSource::Live,
                },
                Err(reason) => {
                    let event = FallbackEvent {
                        symbol: symbol.clone(),
                        reason,
                        at: chrono::Utc::now().to_rfc3339(),
                    };
                    for observer in &self.observers {
                        observer.on_fallback(&event);
                    }
                    LoadedSeries {
                        series: synthetic::generate(&symbol, start, end)?,
                        source: DataSource::Synthetic,
                    }
                }
            },
        };

        for observer in &self.observers {
            observer.on_series_loaded(&loaded.series, loaded.source);
        }
        Ok(loaded)
    }

    /// Fetch from the provider; `Err` carries the human-readable reason to fall back.
    async fn fetch_live(
        &self,
        provider: &dyn MarketDataProvider,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> std::result::Result<TimeSeries, String> {
        let fetched =
            tokio::time::timeout(self.fetch_timeout, provider.fetch_daily(symbol, start, end)).await;

        match fetched {
            Err(_) => Err(format!(
                "{} timed out after {}s",
                provider.name(),
                self.fetch_timeout.as_secs_f64()
            )),
            Ok(Err(e)) => Err(format!("{} error: {e:#}", provider.name())),
            Ok(Ok(bars)) if bars.is_empty() => Err(format!("{} returned no rows", provider.name())),
            Ok(Ok(bars)) => Ok(TimeSeries::new(symbol, bars, ReturnsPolicy::Undefined)),
        }
    }

    /// Latest close and day-over-day change of a market index.
    ///
    /// Indices never fall back to synthetic data.
    pub async fn index_snapshot(&self, index: &IndexListing) -> Result<IndexSnapshot> {
        let provider = self
            .provider
            .as_ref()
            .context("live data is disabled")?;

        let end = chrono::Local::now().date_naive();
        let start = end - chrono::Duration::days(SNAPSHOT_LOOKBACK_DAYS);

        let bars = tokio::time::timeout(
            self.fetch_timeout,
            provider.fetch_daily(index.symbol, start, end),
        )
        .await
        .with_context(|| format!("{} timed out", index.symbol))?
        .with_context(|| format!("failed to fetch {}", index.symbol))?;

        let series = TimeSeries::new(index.symbol, bars, ReturnsPolicy::Undefined);
        let [.., previous, latest] = series.bars() else {
            anyhow::bail!("not enough history for {}", index.symbol);
        };

        let change = latest.close - previous.close;
        let change_percent = change / previous.close * 100.0;

        info!(symbol = index.symbol, price = latest.close, change_percent, "index snapshot");

        Ok(IndexSnapshot {
            symbol: index.symbol.to_string(),
            name: index.name.to_string(),
            price: round2(latest.close),
            change: round2(change),
            change_percent: round2(change_percent),
            volume: latest.volume,
            high: round2(latest.high),
            low: round2(latest.low),
        })
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
