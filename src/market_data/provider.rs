use anyhow::Result;
use chrono::NaiveDate;
use futures_util::future::BoxFuture;

use crate::market_data::bar::Bar;

/// A source of daily OHLCV history.
///
/// Implementations return bars in any order; the caller builds the
/// [`TimeSeries`](crate::market_data::TimeSeries). An empty vector is a valid
/// answer and means "no data for this range".
pub trait MarketDataProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn fetch_daily<'a>(
        &'a self,
        symbol: &'a str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BoxFuture<'a, Result<Vec<Bar>>>;
}
