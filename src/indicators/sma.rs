// =============================================================================
// Simple Moving Average (SMA) and trailing sample standard deviation
// =============================================================================

/// Unweighted trailing mean over `window` values.
///
/// Position `i` is `None` while `i < window - 1`, and whenever the window
/// holds a non-finite value.
pub fn calculate_sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| {
        let mean = w.iter().sum::<f64>() / w.len() as f64;
        mean.is_finite().then_some(mean)
    })
}

/// Trailing sample standard deviation (n - 1 denominator) over `window` values.
///
/// A window of one value has no sample deviation, so `window < 2` is all `None`.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }
    rolling(values, window, |w| {
        let n = w.len() as f64;
        let mean = w.iter().sum::<f64>() / n;
        let var = w.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let sd = var.sqrt();
        sd.is_finite().then_some(sd)
    })
}

/// Apply `f` to each full trailing window; leading positions are `None`.
pub(crate) fn rolling<F>(values: &[f64], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    for (slot, w) in out[window - 1..].iter_mut().zip(values.windows(window)) {
        *slot = f(w);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_leading_entries_undefined() {
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let sma = calculate_sma(&closes, 4);
        assert!(sma[..3].iter().all(Option::is_none));
        assert_eq!(sma[3], Some(2.5));
        assert_eq!(sma[9], Some(8.5));
    }

    #[test]
    fn sma_matches_window_mean() {
        let closes: Vec<f64> = (0..80).map(|x| 100.0 + (x as f64 * 0.7).cos() * 5.0).collect();
        for w in [20, 50] {
            let sma = calculate_sma(&closes, w);
            for i in (w - 1)..closes.len() {
                let mean = closes[i + 1 - w..=i].iter().sum::<f64>() / w as f64;
                assert!((sma[i].unwrap() - mean).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn sma_window_longer_than_input() {
        let sma = calculate_sma(&[1.0; 60], 200);
        assert_eq!(sma.len(), 60);
        assert!(sma.iter().all(Option::is_none));
    }

    #[test]
    fn sma_window_zero() {
        assert_eq!(calculate_sma(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn sma_nan_poisons_window_only() {
        let sma = calculate_sma(&[1.0, f64::NAN, 3.0, 5.0, 7.0], 2);
        assert_eq!(sma, vec![None, None, None, Some(4.0), Some(6.0)]);
    }

    #[test]
    fn std_is_sample_deviation() {
        // Sample std of 2,4,4,4,5,5,7,9 is sqrt(32 / 7).
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = rolling_std(&values, 8);
        assert!((sd[7].unwrap() - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn std_window_one_is_undefined() {
        assert!(rolling_std(&[1.0, 2.0], 1).iter().all(Option::is_none));
    }
}
