//! Synthetic demo data
//!
//! Attaches demo option fields to price bars, and fabricates an offline
//! bar series for runs without an API key. Randomness is scoped to each
//! call through a seeded generator: two calls with the same seed produce
//! identical tables, and no process-wide RNG state is touched.

use chrono::{Duration, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::{OptionRecord, OptionType};
use crate::data::fetch::PriceBar;

/// Attach demo option fields to a bar series, one record per bar
///
/// Strikes land on 100..145 in steps of 5, expiries on 30..360 days in
/// steps of 30, volatility is uniform on [0.1, 0.5), the rate is a flat
/// 1%, and call/put is a coin flip.
pub fn synthesize_records(bars: &[PriceBar], seed: u64) -> Vec<OptionRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    bars.iter()
        .map(|bar| {
            let strike = 100.0 + 5.0 * rng.gen_range(0..10) as f64;
            let expiry_days = 30 * rng.gen_range(1..=12);
            OptionRecord {
                date: Some(bar.date),
                underlying_price: bar.close,
                strike_price: strike,
                time_to_expiry: expiry_days as f64 / 365.0,
                volatility: rng.gen_range(0.1..0.5),
                risk_free_rate: 0.01,
                option_type: if rng.gen_bool(0.5) {
                    OptionType::Call
                } else {
                    OptionType::Put
                },
            }
        })
        .collect()
}

/// Fabricate a daily bar series as a bounded random walk
pub fn synthetic_bars(days: usize, start_price: f64, seed: u64) -> Vec<PriceBar> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut date = NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid demo start date");
    let mut close = start_price;

    (0..days)
        .map(|_| {
            let open = close;
            let daily_return: f64 = rng.gen_range(-0.02..0.02);
            close = (close * (1.0 + daily_return)).max(1.0);

            let bar = PriceBar {
                date,
                open,
                high: open.max(close) * (1.0 + rng.gen_range(0.0..0.005)),
                low: open.min(close) * (1.0 - rng.gen_range(0.0..0.005)),
                close,
                volume: rng.gen_range(1.0e6..5.0e6),
            };
            date += Duration::days(1);
            bar
        })
        .collect()
}
