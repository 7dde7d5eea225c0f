// =============================================================================
// Relative Strength Index (RSI) — simple moving averages
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Split each delta into a gain (positive part) and a loss (magnitude
//          of the negative part).
// Step 3 — Average gains and losses over the trailing `period` deltas with a
//          plain mean (no Wilder smoothing).
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// A window of `period` deltas needs `period + 1` closes, so the first
// `period` positions are undefined.
// =============================================================================

/// Compute the RSI series for `closes`, aligned to the input.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - Index `i < period` => `None`
/// - Average loss zero with a positive average gain => 100.0
/// - Both averages zero (flat window) => `None`, the ratio is indeterminate
/// - Any non-finite close inside the window => `None`
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return out;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let period_f = period as f64;

    // deltas[j] is the change into close j + 1, so the window ending at
    // delta j produces RSI for close j + 1.
    for (j, window) in deltas.windows(period).enumerate() {
        if window.iter().any(|d| !d.is_finite()) {
            continue;
        }
        let (sum_gain, sum_loss) = window.iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l - d)
            }
        });
        out[j + period] = rsi_from_averages(sum_gain / period_f, sum_loss / period_f);
    }

    out
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return None;
        }
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert_eq!(calculate_rsi(&[1.0, 2.0, 3.0], 0), vec![None, None, None]);
    }

    #[test]
    fn rsi_insufficient_data() {
        // 14 closes => 13 deltas < 14.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 14);
        assert_eq!(rsi.len(), 14);
        assert!(rsi.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_first_period_entries_undefined() {
        let closes: Vec<f64> = (0..30).map(|x| 100.0 + (x as f64).sin()).collect();
        let rsi = calculate_rsi(&closes, 14);
        assert!(rsi[..14].iter().all(Option::is_none));
        assert!(rsi[14..].iter().all(Option::is_some));
    }

    #[test]
    fn rsi_all_gains() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.iter().flatten().count(), 16);
        for v in series.into_iter().flatten() {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market_is_undefined() {
        let rsi = calculate_rsi(&[100.0; 30], 14);
        assert!(rsi.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_known_value() {
        // Deltas +2, -1 alternating over a window of 2: avg gain 1, avg loss 0.5.
        let rsi = calculate_rsi(&[10.0, 12.0, 11.0], 2);
        let expected = 100.0 - 100.0 / (1.0 + 2.0);
        assert!((rsi[2].unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }
}
