// =============================================================================
// Response projection
// =============================================================================
//
// Flattens internal series into the JSON shapes the frontend consumes. Wire
// column names live in one table so the mapping can be checked on its own.
// =============================================================================

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::indicators::{IndicatorResultSet, DATE_KEY};
use crate::market_data::TimeSeries;

/// Per-bar fields that can be projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarField {
    Date,
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
    Returns,
    CumulativeReturns,
}

/// Field -> wire key, in output order.
pub const BAR_COLUMNS: &[(BarField, &str)] = &[
    (BarField::Date, "Date"),
    (BarField::Open, "Open"),
    (BarField::High, "High"),
    (BarField::Low, "Low"),
    (BarField::Close, "Close"),
    (BarField::AdjClose, "Adj Close"),
    (BarField::Volume, "Volume"),
    (BarField::Returns, "Returns"),
    (BarField::CumulativeReturns, "Cumulative Returns"),
];

/// Dates go over the wire as `YYYY-MM-DD`.
fn date_key(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Non-finite and undefined values become `null`.
fn number(v: Option<f64>) -> Value {
    v.map_or(Value::Null, Value::from)
}

fn field_value(series: &TimeSeries, row: usize, field: BarField) -> Value {
    let bar = &series.bars()[row];
    match field {
        BarField::Date => Value::String(date_key(bar.date)),
        BarField::Open => number(Some(bar.open)),
        BarField::High => number(Some(bar.high)),
        BarField::Low => number(Some(bar.low)),
        BarField::Close => number(Some(bar.close)),
        BarField::AdjClose => number(Some(bar.adj_close)),
        BarField::Volume => Value::from(bar.volume),
        BarField::Returns => number(series.returns()[row]),
        BarField::CumulativeReturns => number(series.cumulative_returns()[row]),
    }
}

/// One record per bar, keyed by [`BAR_COLUMNS`].
pub fn project_series(series: &TimeSeries) -> Vec<Map<String, Value>> {
    (0..series.len())
        .map(|row| {
            BAR_COLUMNS
                .iter()
                .map(|&(field, key)| (key.to_string(), field_value(series, row, field)))
                .collect()
        })
        .collect()
}

/// `name -> {date -> value}`, undefined entries dropped. The date axis itself
/// is exposed under `Date` as `{date -> date}`.
pub fn project_indicators(set: &IndicatorResultSet) -> BTreeMap<String, BTreeMap<String, Value>> {
    let dates: Vec<String> = set.dates().iter().copied().map(date_key).collect();

    let mut out: BTreeMap<String, BTreeMap<String, Value>> = set
        .iter()
        .map(|s| {
            let points = dates
                .iter()
                .zip(&s.values)
                .filter_map(|(d, v)| v.map(|v| (d.clone(), Value::from(v))))
                .collect();
            (s.name.clone(), points)
        })
        .collect();

    if !set.is_empty() {
        let axis = dates.iter().map(|d| (d.clone(), Value::String(d.clone()))).collect();
        out.insert(DATE_KEY.to_string(), axis);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{compute, IndicatorKind};
    use crate::market_data::bar::{Bar, ReturnsPolicy};
    use crate::market_data::synthetic;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn records_use_wire_column_names() {
        let series = synthetic::generate("TCS.NS", d(2024, 1, 1), d(2024, 1, 5)).unwrap();
        let records = project_series(&series);
        assert_eq!(records.len(), 5);

        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        let mut expected: Vec<&str> = BAR_COLUMNS.iter().map(|(_, k)| *k).collect();
        expected.sort_unstable();
        let mut keys_sorted = keys.clone();
        keys_sorted.sort_unstable();
        assert_eq!(keys_sorted, expected);

        assert_eq!(records[0]["Date"], "2024-01-01");
        assert_eq!(records[0]["Close"], series.bars()[0].close);
        assert_eq!(records[0]["Volume"], series.bars()[0].volume);
        assert_eq!(records[0]["Returns"], 0.0);
    }

    #[test]
    fn undefined_return_projects_to_null() {
        let bars = vec![Bar {
            date: d(2024, 1, 2),
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            adj_close: 1.0,
            volume: 0,
        }];
        let series = TimeSeries::new("X", bars, ReturnsPolicy::Undefined);
        let records = project_series(&series);
        assert_eq!(records[0]["Returns"], Value::Null);
    }

    #[test]
    fn indicators_drop_undefined_points() {
        let series = synthetic::generate("TESTCO", d(2024, 1, 1), d(2024, 3, 22)).unwrap();
        let set = compute(&series, &[IndicatorKind::Sma, IndicatorKind::Rsi]);
        let projected = project_indicators(&set);

        assert_eq!(projected["SMA_20"].len(), 41);
        assert!(projected["SMA_200"].is_empty());
        assert_eq!(projected["RSI"].len(), 46);
        assert_eq!(projected["Date"].len(), 60);
        assert_eq!(projected["Date"]["2024-03-22"], "2024-03-22");
        assert!(!projected["SMA_20"].contains_key("2024-01-01"));
    }

    #[test]
    fn empty_set_has_no_date_axis() {
        let set = IndicatorResultSet::default();
        assert!(project_indicators(&set).is_empty());
    }
}
