use chrono::{Duration, NaiveDate};

use crate::error::CoreError;

/// Lookback used when a timeframe has no recognised unit.
const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// A lookback window such as `5d`, `2w`, `6m` or `1y`.
///
/// Months and years are approximated as 30 and 365 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeframe {
    days: i64,
}

impl Timeframe {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let s = raw.trim().to_ascii_lowercase();
        let Some(unit) = s.chars().last() else {
            return Ok(Self::default());
        };
        let per_unit = match unit {
            'd' => 1,
            'w' => 7,
            'm' => 30,
            'y' => 365,
            _ => return Ok(Self::default()),
        };
        let count: i64 = s[..s.len() - 1]
            .parse()
            .map_err(|_| CoreError::InvalidTimeframe(raw.to_string()))?;
        if count <= 0 {
            return Err(CoreError::InvalidTimeframe(raw.to_string()));
        }
        count
            .checked_mul(per_unit)
            .filter(|days| *days <= 36_500)
            .map(|days| Self { days })
            .ok_or_else(|| CoreError::InvalidTimeframe(raw.to_string()))
    }

    pub fn days(&self) -> i64 {
        self.days
    }

    /// `(today - lookback, today)`.
    pub fn range_ending(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (today - Duration::days(self.days), today)
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Self {
            days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}
