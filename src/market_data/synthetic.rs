// =============================================================================
// Synthetic Series Generator
// =============================================================================
//
// Deterministic fallback OHLCV data for when the live provider fails or
// returns nothing.
//
// Seed:   FNV-1a 64 of the UTF-8 symbol, reduced modulo 10 000.
// Prices: geometric random walk, close_t = base * prod(1 + r_i),
//         r_i ~ N(0.0003, volatility).
// Bars:   open/high/low are independent multiplicative jitters of close,
//         then high/low are widened to cover open and close.
//
// The draw order below is part of the output contract: changing it changes
// every fallback series.
// =============================================================================

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::CoreError;
use crate::market_data::bar::{Bar, ReturnsPolicy, TimeSeries};

/// Mean of the daily return distribution (slight upward drift).
const DRIFT: f64 = 0.0003;

const OPEN_JITTER: (f64, f64) = (0.995, 1.0);
const HIGH_JITTER: (f64, f64) = (1.001, 1.02);
const LOW_JITTER: (f64, f64) = (0.98, 0.999);
const VOLUME_RANGE: (u64, u64) = (100_000, 1_000_000);

const SEED_MODULUS: u64 = 10_000;

/// Starting price and daily volatility for a symbol family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceProfile {
    pub base_price: f64,
    pub volatility: f64,
}

const DEFAULT_PROFILE: PriceProfile = PriceProfile {
    base_price: 1000.0,
    volatility: 0.013,
};

/// Checked in order; the first fragment contained in the symbol wins.
const PROFILES: &[(&[&str], PriceProfile)] = &[
    (&["RELIANCE"], PriceProfile { base_price: 2500.0, volatility: 0.015 }),
    (&["TCS"], PriceProfile { base_price: 3400.0, volatility: 0.010 }),
    (&["HDFC"], PriceProfile { base_price: 1600.0, volatility: 0.012 }),
    (&["INFOSYS", "INFY"], PriceProfile { base_price: 1400.0, volatility: 0.011 }),
    (&["POLYCAB"], PriceProfile { base_price: 5800.0, volatility: 0.018 }),
];

/// Look up the price profile for `symbol` by substring match.
pub fn profile_for(symbol: &str) -> PriceProfile {
    PROFILES
        .iter()
        .find(|(fragments, _)| fragments.iter().any(|f| symbol.contains(f)))
        .map(|(_, p)| *p)
        .unwrap_or(DEFAULT_PROFILE)
}

/// FNV-1a, 64-bit. Stable across processes, platforms and releases.
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET_BASIS, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(PRIME)
    })
}

/// The RNG seed used for `symbol`.
pub fn seed_for(symbol: &str) -> u64 {
    fnv1a_64(symbol.as_bytes()) % SEED_MODULUS
}

/// Every Monday–Friday in `[start, end]`, inclusive.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

/// Generate the synthetic series for `symbol` over `[start, end]`.
///
/// Same symbol and range always give bit-identical output. A range that
/// covers only a weekend yields an empty series.
pub fn generate(symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<TimeSeries, CoreError> {
    if start > end {
        return Err(CoreError::InvalidDateRange { start, end });
    }

    let dates = business_days(start, end);
    let n = dates.len();
    let profile = profile_for(symbol);
    let mut rng = StdRng::seed_from_u64(seed_for(symbol));

    let mut growth = 1.0_f64;
    let closes: Vec<f64> = (0..n)
        .map(|_| {
            let z: f64 = rng.sample(StandardNormal);
            growth *= 1.0 + DRIFT + profile.volatility * z;
            profile.base_price * growth
        })
        .collect();

    let open_factors = uniform_draws(&mut rng, n, OPEN_JITTER);
    let high_factors = uniform_draws(&mut rng, n, HIGH_JITTER);
    let low_factors = uniform_draws(&mut rng, n, LOW_JITTER);
    let volumes: Vec<u64> = (0..n)
        .map(|_| rng.random_range(VOLUME_RANGE.0..VOLUME_RANGE.1))
        .collect();

    let bars = (0..n)
        .map(|i| {
            let close = closes[i];
            let open = close * open_factors[i];
            let high = (close * high_factors[i]).max(open).max(close);
            let low = (close * low_factors[i]).min(open).min(close);
            Bar {
                date: dates[i],
                open,
                high,
                low,
                close,
                adj_close: close,
                volume: volumes[i],
            }
        })
        .collect();

    Ok(TimeSeries::new(symbol, bars, ReturnsPolicy::ZeroFirst))
}

fn uniform_draws(rng: &mut StdRng, n: usize, (lo, hi): (f64, f64)) -> Vec<f64> {
    (0..n).map(|_| rng.random_range(lo..hi)).collect()
}
