// =============================================================================
// Indicator Engine
// =============================================================================
//
// Computes a requested set of indicators over one TimeSeries. Window sizes are
// fixed; every output series is aligned to the source date axis, with `None`
// where the trailing window is not yet full.
// =============================================================================

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::indicators::bollinger::calculate_bollinger;
use crate::indicators::ema::calculate_ema;
use crate::indicators::macd::calculate_macd;
use crate::indicators::rsi::calculate_rsi;
use crate::indicators::sma::calculate_sma;
use crate::market_data::TimeSeries;

/// Key under which the shared date axis is exposed.
pub const DATE_KEY: &str = "Date";

pub const SMA_WINDOWS: [usize; 3] = [20, 50, 200];
pub const EMA_SPANS: [usize; 2] = [12, 26];
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BB_WINDOW: usize = 20;
pub const BB_NUM_STD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
    Bollinger,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 5] = [Self::Sma, Self::Ema, Self::Rsi, Self::Macd, Self::Bollinger];

    /// Case-insensitive wire name lookup. Unknown names give `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sma" => Some(Self::Sma),
            "ema" => Some(Self::Ema),
            "rsi" => Some(Self::Rsi),
            "macd" => Some(Self::Macd),
            "bollinger" | "bollinger_bands" | "bb" => Some(Self::Bollinger),
            _ => None,
        }
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sma => write!(f, "sma"),
            Self::Ema => write!(f, "ema"),
            Self::Rsi => write!(f, "rsi"),
            Self::Macd => write!(f, "macd"),
            Self::Bollinger => write!(f, "bollinger"),
        }
    }
}

/// One named, date-aligned indicator series.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    /// Number of defined entries.
    #[cfg(test)]
    pub fn defined(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Indicator name -> series, all sharing one date axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorResultSet {
    dates: Vec<NaiveDate>,
    series: BTreeMap<String, IndicatorSeries>,
}

impl IndicatorResultSet {
    fn insert(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.dates.len());
        let name = name.into();
        self.series.insert(name.clone(), IndicatorSeries { name, values });
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of rows on the date axis.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&IndicatorSeries> {
        self.series.get(name)
    }

    /// Every key, `Date` included once any indicator is present.
    #[cfg(test)]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.series.keys().map(String::as_str).collect();
        if !keys.is_empty() {
            keys.push(DATE_KEY);
        }
        keys
    }

    #[cfg(test)]
    pub fn contains_key(&self, name: &str) -> bool {
        if name == DATE_KEY {
            !self.series.is_empty()
        } else {
            self.series.contains_key(name)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicatorSeries> {
        self.series.values()
    }
}

/// Compute every requested indicator over `series`.
///
/// Duplicate kinds are computed once. Never fails: short history shows up as
/// `None` entries.
pub fn compute(series: &TimeSeries, requested: &[IndicatorKind]) -> IndicatorResultSet {
    let closes = series.closes();
    let mut result = IndicatorResultSet {
        dates: series.dates(),
        series: BTreeMap::new(),
    };

    let mut kinds = requested.to_vec();
    kinds.sort();
    kinds.dedup();

    for kind in kinds {
        match kind {
            IndicatorKind::Sma => {
                for w in SMA_WINDOWS {
                    result.insert(format!("SMA_{w}"), calculate_sma(&closes, w));
                }
            }
            IndicatorKind::Ema => {
                for span in EMA_SPANS {
                    result.insert(format!("EMA_{span}"), calculate_ema(&closes, span));
                }
            }
            IndicatorKind::Rsi => {
                result.insert("RSI", calculate_rsi(&closes, RSI_PERIOD));
            }
            IndicatorKind::Macd => {
                let lines = calculate_macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
                result.insert("MACD", lines.macd);
                result.insert("MACD_Signal", lines.signal);
                result.insert("MACD_Histogram", lines.histogram);
            }
            IndicatorKind::Bollinger => {
                let bands = calculate_bollinger(&closes, BB_WINDOW, BB_NUM_STD);
                result.insert("BB_Upper", bands.upper);
                result.insert("BB_Middle", bands.middle);
                result.insert("BB_Lower", bands.lower);
            }
        }
    }

    result
}

/// Like [`compute`], taking wire names. Unknown names are ignored.
pub fn compute_by_name<S: AsRef<str>>(series: &TimeSeries, names: &[S]) -> IndicatorResultSet {
    let kinds: Vec<IndicatorKind> = names
        .iter()
        .filter_map(|n| IndicatorKind::parse(n.as_ref()))
        .collect();
    compute(series, &kinds)
}
