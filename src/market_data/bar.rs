use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One daily OHLCV bar.
///
/// `low <= open, close <= high` holds for synthetic bars by construction and
/// is assumed (not verified) for provider data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

/// How the first bar's return is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnsPolicy {
    /// No prior bar, so the first return is undefined.
    Undefined,
    /// The first return is zero. Used for fallback series, which must not
    /// contain undefined returns.
    ZeroFirst,
}

// ---------------------------------------------------------------------------
// TimeSeries
// ---------------------------------------------------------------------------

/// An ordered daily series for one symbol, strictly increasing by date.
///
/// `returns` and `cumulative_returns` are derived once at construction and
/// stay aligned with `bars`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    symbol: String,
    bars: Vec<Bar>,
    returns: Vec<Option<f64>>,
    cumulative_returns: Vec<Option<f64>>,
}

impl TimeSeries {
    /// Build a series from bars in any order.
    ///
    /// Bars are sorted by date; when two bars share a date the later one in
    /// the input wins.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>, policy: ReturnsPolicy) -> Self {
        // Stable sort keeps input order among equal dates, so "last wins" below
        // means "last in the input".
        bars.sort_by_key(|b| b.date);
        let mut unique: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match unique.last_mut() {
                Some(prev) if prev.date == bar.date => *prev = bar,
                _ => unique.push(bar),
            }
        }

        let returns = daily_returns(&unique, policy);
        let cumulative_returns = compound(&returns);

        Self {
            symbol: symbol.into(),
            bars: unique,
            returns,
            cumulative_returns,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn returns(&self) -> &[Option<f64>] {
        &self.returns
    }

    pub fn cumulative_returns(&self) -> &[Option<f64>] {
        &self.cumulative_returns
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

// ---------------------------------------------------------------------------
// Derived columns
// ---------------------------------------------------------------------------

fn daily_returns(bars: &[Bar], policy: ReturnsPolicy) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(bars.len());
    if bars.is_empty() {
        return out;
    }
    out.push(match policy {
        ReturnsPolicy::Undefined => None,
        ReturnsPolicy::ZeroFirst => Some(0.0),
    });
    for pair in bars.windows(2) {
        let r = pair[1].close / pair[0].close - 1.0;
        out.push(r.is_finite().then_some(r));
    }
    out
}

/// Running product of `1 + r`, minus one. Undefined returns are skipped in
/// the product and stay undefined at their own position.
fn compound(returns: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut growth = 1.0_f64;
    returns
        .iter()
        .map(|r| {
            let r = (*r)?;
            growth *= 1.0 + r;
            let cum = growth - 1.0;
            cum.is_finite().then_some(cum)
        })
        .collect()
}
