// =============================================================================
// Trend extrapolation
// =============================================================================
//
// Projects the recent slope of SMA_20 forward:
//
//   avg_change = mean(diff(last 30 defined SMA_20 values))
//   price_i    = max(last_sma + avg_change * i, 0)       for i = 1..=days
//
// Dates are consecutive business days after the last date in the input.
// =============================================================================

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::indicators::IndicatorResultSet;
use crate::prediction::{PredictedPoint, PredictionError};

/// Smoothed series the trend is read from.
pub const SOURCE_SERIES: &str = "SMA_20";
/// Trailing rows considered for the slope.
pub const LOOKBACK_ROWS: usize = 30;
/// Rows the input must have at all.
pub const MIN_ROWS: usize = 10;

pub fn extrapolate(data: &IndicatorResultSet, days: u32) -> Result<Vec<PredictedPoint>, PredictionError> {
    if data.len() < MIN_ROWS {
        return Err(PredictionError::NotEnoughData);
    }
    let source = data
        .get(SOURCE_SERIES)
        .ok_or(PredictionError::MissingSeries(SOURCE_SERIES))?;
    let last_date = *data.dates().last().ok_or(PredictionError::NotEnoughData)?;

    let tail_start = source.values.len().saturating_sub(LOOKBACK_ROWS);
    let recent: Vec<f64> = source.values[tail_start..].iter().flatten().copied().collect();
    if recent.len() < 2 {
        return Err(PredictionError::NotEnoughData);
    }
    let last_price = recent[recent.len() - 1];

    let avg_change =
        recent.windows(2).map(|w| w[1] - w[0]).sum::<f64>() / (recent.len() - 1) as f64;

    let points = next_business_days(last_date, days as usize)
        .into_iter()
        .zip(1u32..)
        .filter_map(|(date, i)| {
            let price = (last_price + avg_change * f64::from(i)).max(0.0);
            price.is_finite().then_some(PredictedPoint {
                date,
                predicted_price: price,
            })
        })
        .collect();

    Ok(points)
}

/// The `count` business days strictly after `after`.
// Each forecast gets its own trading day. Stepping calendar days and pushing
// weekends to Monday would give two or three points the same Monday date.
pub fn next_business_days(after: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(count);
    let mut day = after;
    while out.len() < count {
        day += Duration::days(1);
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            out.push(day);
        }
    }
    out
}
