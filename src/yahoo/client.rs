// =============================================================================
// Yahoo Finance chart client
// =============================================================================
//
// Daily history for NSE/BSE symbols via the public v8 chart endpoint. No
// credentials are needed. The HTTP client carries its own timeout; the data
// service wraps each call in a second, configurable one.
// =============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use futures_util::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::market_data::{Bar, MarketDataProvider};

const USER_AGENT: &str = concat!("stockpredict/", env!("CARGO_PKG_VERSION"));

/// Yahoo Finance REST client.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }

    /// GET /v8/finance/chart/{symbol} with a daily interval.
    ///
    /// `end` is inclusive.
    #[instrument(skip(self), name = "yahoo::get_chart")]
    pub async fn get_chart(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Bar>> {
        let period1 = start
            .and_hms_opt(0, 0, 0)
            .context("invalid start date")?
            .and_utc()
            .timestamp();
        let period2 = end
            .succ_opt()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .context("invalid end date")?
            .and_utc()
            .timestamp();

        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "div,split".to_string()),
            ])
            .send()
            .await
            .context("GET /v8/finance/chart request failed")?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("failed to read chart response body")?;

        if !status.is_success() {
            anyhow::bail!("Yahoo GET /v8/finance/chart/{symbol} returned {status}: {body}");
        }

        let bars = parse_chart(&body)?;
        debug!(symbol, count = bars.len(), "chart fetched");
        Ok(bars)
    }
}

impl MarketDataProvider for YahooClient {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn fetch_daily<'a>(
        &'a self,
        symbol: &'a str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BoxFuture<'a, Result<Vec<Bar>>> {
        self.get_chart(symbol, start, end).boxed()
    }
}

// =============================================================================
// Response parsing
// =============================================================================

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC, seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Parse a chart response body into bars.
///
/// Rows missing any of open/high/low/close are skipped. A missing adjusted
/// close falls back to the close, a missing volume to zero.
pub(crate) fn parse_chart(body: &str) -> Result<Vec<Bar>> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).context("failed to parse chart response")?;

    if let Some(err) = envelope.chart.error.filter(|e| !e.is_null()) {
        anyhow::bail!("Yahoo chart error: {err}");
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let Some(quote) = result.indicators.quote.first() else {
        return Ok(Vec::new());
    };
    let adj = result.indicators.adjclose.first().map(|a| a.adjclose.as_slice());

    let at = |v: &[Option<f64>], i: usize| v.get(i).copied().flatten();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(dt) = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0) else {
            warn!(ts, "skipping chart row with out-of-range timestamp");
            continue;
        };
        let (Some(open), Some(high), Some(low), Some(close)) = (
            at(&quote.open, i),
            at(&quote.high, i),
            at(&quote.low, i),
            at(&quote.close, i),
        ) else {
            continue;
        };
        let adj_close = adj.and_then(|a| at(a, i)).unwrap_or(close);
        let volume = at(&quote.volume, i)
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64)
            .unwrap_or(0);

        bars.push(Bar {
            date: dt.date_naive(),
            open,
            high,
            low,
            close,
            adj_close,
            volume,
        });
    }

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
      "chart": {
        "result": [{
          "meta": { "symbol": "TCS.NS", "gmtoffset": 19800 },
          "timestamp": [1704080700, 1704167100, 1704253500],
          "indicators": {
            "quote": [{
              "open":   [3800.0, null, 3850.5],
              "high":   [3830.0, 3840.0, 3900.0],
              "low":    [3790.0, 3780.0, 3840.0],
              "close":  [3820.0, 3800.0, 3890.0],
              "volume": [1200000, 900000, null]
            }],
            "adjclose": [{ "adjclose": [3810.0, 3790.0, null] }]
          }
        }],
        "error": null
      }
    }"#;

    #[test]
    fn parses_rows_and_skips_incomplete_ones() {
        let bars = parse_chart(SAMPLE).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(bars[0].adj_close, 3810.0);
        assert_eq!(bars[0].volume, 1_200_000);
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        // Missing adjclose and volume.
        assert_eq!(bars[1].adj_close, 3890.0);
        assert_eq!(bars[1].volume, 0);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let body = r#"{ "chart": { "result": [], "error": null } }"#;
        assert!(parse_chart(body).unwrap().is_empty());
    }

    #[test]
    fn chart_error_is_reported() {
        let body = r#"{ "chart": { "result": null,
            "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" } } }"#;
        assert!(parse_chart(body).is_err());
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(parse_chart("<html>").is_err());
    }
}
