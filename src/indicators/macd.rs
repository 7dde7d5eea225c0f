// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD      = EMA_fast(close) - EMA_slow(close)
//   Signal    = EMA_signal(MACD)
//   Histogram = MACD - Signal
//
// All three EMAs are seeded by their first value, so the lines are defined
// from the first bar.

use crate::indicators::ema::calculate_ema;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdLines {
    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);

    let macd: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    let macd_raw: Vec<f64> = macd.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    let signal_line = calculate_ema(&macd_raw, signal);

    let histogram = macd
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    MacdLines {
        macd,
        signal: signal_line,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(n: usize) -> Vec<f64> {
        (0..n).map(|x| 200.0 + (x as f64 * 0.4).sin() * 8.0 + x as f64 * 0.1).collect()
    }

    #[test]
    fn histogram_is_macd_minus_signal() {
        let lines = calculate_macd(&wave(80), 12, 26, 9);
        for i in 0..80 {
            let (m, s, h) = (
                lines.macd[i].unwrap(),
                lines.signal[i].unwrap(),
                lines.histogram[i].unwrap(),
            );
            assert_eq!(h, m - s);
        }
    }

    #[test]
    fn macd_starts_at_zero() {
        let lines = calculate_macd(&wave(5), 12, 26, 9);
        assert_eq!(lines.macd[0], Some(0.0));
        assert_eq!(lines.signal[0], Some(0.0));
        assert_eq!(lines.histogram[0], Some(0.0));
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let lines = calculate_macd(&closes, 12, 26, 9);
        assert!(lines.macd[59].unwrap() > 0.0);
        assert!(lines.histogram[59].unwrap() > 0.0);
    }

    #[test]
    fn macd_empty() {
        let lines = calculate_macd(&[], 12, 26, 9);
        assert!(lines.macd.is_empty() && lines.signal.is_empty() && lines.histogram.is_empty());
    }
}
