// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the trailing *sample* standard
// deviation over the same window.

use crate::indicators::sma::{calculate_sma, rolling_std};

/// Date-aligned band series.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Calculate Bollinger Bands over the whole series.
///
/// Each band is `None` where the window is not yet full.
pub fn calculate_bollinger(closes: &[f64], window: usize, num_std: f64) -> BollingerBands {
    let middle = calculate_sma(closes, window);
    let sd = rolling_std(closes, window);

    let band = |sign: f64| -> Vec<Option<f64>> {
        middle
            .iter()
            .zip(&sd)
            .map(|(m, s)| {
                let v = (*m)? + sign * num_std * (*s)?;
                v.is_finite().then_some(v)
            })
            .collect()
    };

    BollingerBands {
        upper: band(1.0),
        lower: band(-1.0),
        middle,
    }
}
