//! Black-Scholes Model
//!
//! Provides:
//! - Closed-form European option pricing
//! - Analytic Greeks from the same d1/d2 terms
//!
//! Serves as the reference price for the binomial lattice (which converges
//! to it) and as the forward model inverted by the implied-volatility
//! solver.

use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;

use crate::core::{Greeks, OptVolError, OptVolResult, OptionType};

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    let normal = Normal::new(0.0, 1.0).unwrap();
    normal.cdf(x)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 term
pub fn d1(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> f64 {
    ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes d2 term
pub fn d2(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> f64 {
    d1(spot, strike, time, rate, vol) - vol * time.sqrt()
}

/// Check the preconditions shared by every pricing and Greek computation.
///
/// S, K, T and σ must all be strictly positive and finite; the rate may be
/// zero or negative. Violations are caller errors, never a silent NaN.
pub(crate) fn validate(spot: f64, strike: f64, time: f64, vol: f64) -> OptVolResult<()> {
    if !(spot > 0.0) || !spot.is_finite() {
        return Err(OptVolError::invalid_input(format!(
            "underlying price must be positive, got {spot}"
        )));
    }
    if !(strike > 0.0) || !strike.is_finite() {
        return Err(OptVolError::invalid_input(format!(
            "strike price must be positive, got {strike}"
        )));
    }
    if !(time > 0.0) || !time.is_finite() {
        return Err(OptVolError::invalid_input(format!(
            "time to expiry must be positive, got {time}"
        )));
    }
    if !(vol > 0.0) || !vol.is_finite() {
        return Err(OptVolError::invalid_input(format!(
            "volatility must be positive, got {vol}"
        )));
    }
    Ok(())
}

/// Black-Scholes European option price
pub fn price(
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    vol: f64,
    option_type: OptionType,
) -> OptVolResult<f64> {
    validate(spot, strike, time, vol)?;

    let d1 = d1(spot, strike, time, rate, vol);
    let d2 = d2(spot, strike, time, rate, vol);
    let df = (-rate * time).exp();

    Ok(match option_type {
        OptionType::Call => spot * norm_cdf(d1) - strike * df * norm_cdf(d2),
        OptionType::Put => strike * df * norm_cdf(-d2) - spot * norm_cdf(-d1),
    })
}

/// Analytic Black-Scholes Greeks
///
/// Theta is per year and vega per unit volatility (no per-day or
/// per-percent scaling).
pub fn greeks(
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    vol: f64,
    option_type: OptionType,
) -> OptVolResult<Greeks> {
    validate(spot, strike, time, vol)?;

    let d1 = d1(spot, strike, time, rate, vol);
    let d2 = d2(spot, strike, time, rate, vol);
    let sqrt_t = time.sqrt();
    let df = (-rate * time).exp();
    let pdf_d1 = norm_pdf(d1);

    let delta = match option_type {
        OptionType::Call => norm_cdf(d1),
        OptionType::Put => norm_cdf(d1) - 1.0,
    };

    // Gamma and vega are identical for calls and puts
    let gamma = pdf_d1 / (spot * vol * sqrt_t);
    let vega = spot * pdf_d1 * sqrt_t;

    let decay = -spot * pdf_d1 * vol / (2.0 * sqrt_t);
    let theta = match option_type {
        OptionType::Call => decay - rate * strike * df * norm_cdf(d2),
        OptionType::Put => decay + rate * strike * df * norm_cdf(-d2),
    };

    let rho = match option_type {
        OptionType::Call => strike * time * df * norm_cdf(d2),
        OptionType::Put => -strike * time * df * norm_cdf(-d2),
    };

    Ok(Greeks::new(delta, gamma, theta, vega, rho))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_norm_cdf() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-10);
        assert!((norm_cdf(1.96) - 0.975).abs() < 0.001);
        assert!((norm_cdf(-1.96) - 0.025).abs() < 0.001);
    }

    #[test]
    fn test_known_call_price() {
        // S=100, K=100, T=1, r=1%, σ=20%
        let call = price(100.0, 100.0, 1.0, 0.01, 0.20, OptionType::Call).unwrap();
        assert_abs_diff_eq!(call, 8.433, epsilon = 1e-3);
    }

    #[test]
    fn test_known_put_price() {
        let put = price(100.0, 100.0, 1.0, 0.01, 0.20, OptionType::Put).unwrap();
        assert_abs_diff_eq!(put, 7.4387, epsilon = 1e-3);
    }

    #[test]
    fn test_put_call_parity() {
        // C - P = S - K * e^(-rT) across a grid of inputs
        for &spot in &[80.0, 100.0, 120.0] {
            for &strike in &[90.0, 100.0, 110.0] {
                for &time in &[0.1, 0.5, 2.0] {
                    for &rate in &[-0.01, 0.0, 0.05] {
                        for &vol in &[0.1, 0.3, 0.8] {
                            let call = price(spot, strike, time, rate, vol, OptionType::Call)
                                .unwrap();
                            let put =
                                price(spot, strike, time, rate, vol, OptionType::Put).unwrap();
                            let parity = spot - strike * (-rate * time).exp();
                            assert_abs_diff_eq!(call - put, parity, epsilon = 1e-9);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_delta_identity() {
        // delta_call - delta_put = 1 for identical inputs
        for &strike in &[80.0, 100.0, 125.0] {
            let call = greeks(100.0, strike, 0.5, 0.02, 0.25, OptionType::Call).unwrap();
            let put = greeks(100.0, strike, 0.5, 0.02, 0.25, OptionType::Put).unwrap();
            assert_abs_diff_eq!(call.delta - put.delta, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_greeks_signs() {
        let g = greeks(100.0, 100.0, 1.0, 0.05, 0.20, OptionType::Call).unwrap();
        assert!(g.delta > 0.5 && g.delta < 0.7);
        assert!(g.gamma > 0.0);
        assert!(g.theta < 0.0);
        assert!(g.vega > 0.0);
        assert!(g.rho > 0.0);

        let p = greeks(100.0, 100.0, 1.0, 0.05, 0.20, OptionType::Put).unwrap();
        assert!(p.delta < 0.0);
        assert!(p.rho < 0.0);
        // Gamma and vega are type-independent
        assert_abs_diff_eq!(g.gamma, p.gamma, epsilon = 1e-12);
        assert_abs_diff_eq!(g.vega, p.vega, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        for (s, k, t, v) in [
            (0.0, 100.0, 1.0, 0.2),
            (-1.0, 100.0, 1.0, 0.2),
            (100.0, 0.0, 1.0, 0.2),
            (100.0, 100.0, 0.0, 0.2),
            (100.0, 100.0, -0.5, 0.2),
            (100.0, 100.0, 1.0, 0.0),
            (100.0, 100.0, 1.0, -0.2),
            (f64::NAN, 100.0, 1.0, 0.2),
        ] {
            let err = price(s, k, t, 0.01, v, OptionType::Call).unwrap_err();
            assert!(matches!(err, OptVolError::InvalidInput(_)), "{s} {k} {t} {v}");
            let err = greeks(s, k, t, 0.01, v, OptionType::Call).unwrap_err();
            assert!(matches!(err, OptVolError::InvalidInput(_)));
        }
    }
}
