//! Batch Valuation
//!
//! Applies the pricing models to a collection of option records: for each
//! record, in order, the Black-Scholes price, the binomial-lattice price,
//! the analytic Greeks, and the implied volatility recovered from the
//! Black-Scholes price.
//!
//! `value_record` is a pure per-record transform; `value_batch` maps it
//! independently over a slice and returns index-aligned per-record results,
//! so one bad record never aborts the rest. Records are independent, which
//! also makes the batch safe to fan out across threads should a caller
//! want to, since nothing here shares mutable state.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{Greeks, OptVolResult, OptionRecord};
use crate::models::implied_vol::{implied_volatility, IvConfig, IvSolution};
use crate::models::{binomial, black_scholes};

/// Model settings for one valuation pass
#[derive(Debug, Clone)]
pub struct ValuationConfig {
    /// Binomial lattice depth
    pub binomial_steps: usize,
    /// Implied-volatility search bounds and tolerances
    pub iv: IvConfig,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            binomial_steps: binomial::DEFAULT_STEPS,
            iv: IvConfig::default(),
        }
    }
}

/// Derived values for one record, produced by the core and never supplied
/// by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Valuation {
    /// Closed-form Black-Scholes price
    pub bs_price: f64,
    /// Binomial lattice price
    pub bt_price: f64,
    /// Analytic Black-Scholes Greeks
    pub greeks: Greeks,
    /// Implied volatility recovered from the Black-Scholes price; `None`
    /// when no reliable value exists for the record
    pub implied_vol: Option<IvSolution>,
}

/// Value a single record with both models
///
/// A failing implied-volatility solve downgrades to `implied_vol = None`
/// with a warning; the prices and Greeks of the record are still good.
pub fn value_record(record: &OptionRecord, config: &ValuationConfig) -> OptVolResult<Valuation> {
    let OptionRecord {
        underlying_price: spot,
        strike_price: strike,
        time_to_expiry: time,
        volatility: vol,
        risk_free_rate: rate,
        option_type,
        ..
    } = *record;

    let bs_price = black_scholes::price(spot, strike, time, rate, vol, option_type)?;
    let bt_price = binomial::price(
        spot,
        strike,
        time,
        rate,
        vol,
        option_type,
        config.binomial_steps,
    )?;
    let greeks = black_scholes::greeks(spot, strike, time, rate, vol, option_type)?;

    let implied_vol =
        match implied_volatility(bs_price, spot, strike, time, rate, option_type, &config.iv) {
            Ok(solution) => Some(solution),
            Err(e) => {
                warn!(error = %e, "implied volatility unavailable for record");
                None
            }
        };

    Ok(Valuation {
        bs_price,
        bt_price,
        greeks,
        implied_vol,
    })
}

/// Value every record independently, returning index-aligned per-record
/// results (partial-failure semantics)
pub fn value_batch(
    records: &[OptionRecord],
    config: &ValuationConfig,
) -> Vec<OptVolResult<Valuation>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let result = value_record(record, config);
            if let Err(e) = &result {
                warn!(index, error = %e, "record valuation failed");
            }
            result
        })
        .collect()
}

/// Absolute model disagreement, |BS − BT| / BS × 100
///
/// A sanity metric for the lattice depth, not a pricing output.
pub fn price_difference_percent(valuation: &Valuation) -> f64 {
    (valuation.bs_price - valuation.bt_price).abs() / valuation.bs_price * 100.0
}

/// Mean model disagreement across the successful results of a batch
pub fn mean_price_difference(results: &[OptVolResult<Valuation>]) -> Option<f64> {
    let diffs: Vec<f64> = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(price_difference_percent)
        .collect();
    if diffs.is_empty() {
        None
    } else {
        Some(diffs.iter().sum::<f64>() / diffs.len() as f64)
    }
}

/// Extract the surface-builder inputs (strike, expiry, implied vol) from a
/// valued batch, skipping failed records and records without a reliable
/// implied volatility
pub fn surface_inputs(
    records: &[OptionRecord],
    results: &[OptVolResult<Valuation>],
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut strikes = Vec::new();
    let mut expiries = Vec::new();
    let mut vols = Vec::new();

    for (record, result) in records.iter().zip(results) {
        if let Ok(valuation) = result {
            if let Some(solution) = &valuation.implied_vol {
                strikes.push(record.strike_price);
                expiries.push(record.time_to_expiry);
                vols.push(solution.sigma);
            }
        }
    }

    (strikes, expiries, vols)
}
