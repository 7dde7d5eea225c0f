// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha  = 2 / (span + 1)
//   EMA_0  = close_0
//   EMA_t  = alpha * close_t + (1 - alpha) * EMA_{t-1}
//
// Seeded by the first value with no bias adjustment, so every position from
// the first finite input onwards is defined.
// =============================================================================

/// Compute the EMA series for `values` with the given `span`.
///
/// The output has the same length as the input.
///
/// # Edge cases
/// - `span == 0` => all `None`
/// - Leading non-finite inputs => `None` until the first finite value seeds the average
/// - A non-finite input after seeding repeats the previous EMA and leaves the state untouched
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<Option<f64>> {
    if span == 0 {
        return vec![None; values.len()];
    }
    let alpha = 2.0 / (span as f64 + 1.0);

    let mut prev: Option<f64> = None;
    values
        .iter()
        .map(|&v| {
            if v.is_finite() {
                let next = match prev {
                    None => v,
                    Some(p) => alpha * v + (1.0 - alpha) * p,
                };
                prev = Some(next);
            }
            prev
        })
        .collect()
}
