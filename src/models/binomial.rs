//! Binomial Tree Model
//!
//! Cox-Ross-Rubinstein recombining lattice for European options. The lattice
//! price converges to the Black-Scholes price as the step count grows, which
//! makes the step count an accuracy knob rather than a tuning detail.
//!
//! Only a rolling array of node values is kept: the terminal layer is filled
//! with payoffs and collapsed in place by backward induction, so memory is
//! O(steps) rather than O(steps²).

use crate::core::{OptVolError, OptVolResult, OptionType};
use crate::models::black_scholes;

/// Default lattice depth, matching the accuracy of the reference
/// implementation at typical expiries.
pub const DEFAULT_STEPS: usize = 100;

/// CRR binomial lattice price for a European option
///
/// The risk-neutral up-probability `p = (e^{r·dt} − d)/(u − d)` is not
/// clamped: parameter combinations pushing it outside [0, 1] make the
/// lattice unstable, and are surfaced as a `Numerical` error instead of
/// being silently corrected.
pub fn price(
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    vol: f64,
    option_type: OptionType,
    steps: usize,
) -> OptVolResult<f64> {
    black_scholes::validate(spot, strike, time, vol)?;
    if steps == 0 {
        return Err(OptVolError::invalid_input("binomial steps must be > 0"));
    }

    let dt = time / steps as f64;
    let u = (vol * dt.sqrt()).exp();
    let d = 1.0 / u;
    let p = ((rate * dt).exp() - d) / (u - d);
    if !(0.0..=1.0).contains(&p) || !p.is_finite() {
        return Err(OptVolError::numerical(format!(
            "risk-neutral probability {p:.6} outside [0, 1]; lattice is unstable for these inputs"
        )));
    }

    let disc = (-rate * dt).exp();
    let disc_p = disc * p;
    let disc_q = disc * (1.0 - p);

    // Terminal layer: node i carries i up-moves, spot * u^i * d^(steps-i).
    // The multiplicative recurrence avoids O(steps) powf calls per node.
    let ratio = u / d;
    let mut values = vec![0.0_f64; steps + 1];
    let mut st = spot * d.powi(steps as i32);
    for value in values.iter_mut() {
        *value = option_type.intrinsic(st, strike);
        st *= ratio;
    }

    // Backward induction down to the root
    for j in (0..steps).rev() {
        for i in 0..=j {
            values[i] = disc_p * values[i + 1] + disc_q * values[i];
        }
    }

    Ok(values[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::black_scholes;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_known_call_price() {
        // S=100, K=100, T=1, r=1%, σ=20%: BS reference ≈ 8.433
        let bt = price(100.0, 100.0, 1.0, 0.01, 0.20, OptionType::Call, 500).unwrap();
        assert_abs_diff_eq!(bt, 8.433, epsilon = 0.05);
    }

    #[test]
    fn test_put_tracks_black_scholes() {
        let bt = price(100.0, 100.0, 1.0, 0.01, 0.20, OptionType::Put, 500).unwrap();
        let bs = black_scholes::price(100.0, 100.0, 1.0, 0.01, 0.20, OptionType::Put).unwrap();
        assert_abs_diff_eq!(bt, bs, epsilon = 0.05);
    }

    #[test]
    fn test_convergence_to_black_scholes() {
        // The lattice error must shrink as steps grow, and at 2000 steps an
        // ATM option must be within 0.1% of the closed form.
        let bs = black_scholes::price(100.0, 100.0, 1.0, 0.01, 0.20, OptionType::Call).unwrap();

        let coarse = price(100.0, 100.0, 1.0, 0.01, 0.20, OptionType::Call, 50).unwrap();
        let fine = price(100.0, 100.0, 1.0, 0.01, 0.20, OptionType::Call, 2000).unwrap();

        assert!((fine - bs).abs() < (coarse - bs).abs());
        assert!((fine - bs).abs() / bs < 0.001);
    }

    #[test]
    fn test_convergence_across_inputs() {
        for &(spot, strike, time, rate, vol) in &[
            (100.0, 90.0, 0.5, 0.03, 0.25),
            (50.0, 60.0, 2.0, 0.0, 0.4),
            (120.0, 100.0, 0.1, -0.01, 0.15),
        ] {
            for option_type in [OptionType::Call, OptionType::Put] {
                let bs =
                    black_scholes::price(spot, strike, time, rate, vol, option_type).unwrap();
                let bt = price(spot, strike, time, rate, vol, option_type, 2000).unwrap();
                assert_abs_diff_eq!(bt, bs, epsilon = 0.02);
            }
        }
    }

    #[test]
    fn test_zero_steps_rejected() {
        let err = price(100.0, 100.0, 1.0, 0.01, 0.2, OptionType::Call, 0).unwrap_err();
        assert!(matches!(err, OptVolError::InvalidInput(_)));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let err = price(100.0, -5.0, 1.0, 0.01, 0.2, OptionType::Call, 100).unwrap_err();
        assert!(matches!(err, OptVolError::InvalidInput(_)));
    }

    #[test]
    fn test_unstable_probability_surfaced() {
        // One giant step with r >> σ pushes p above 1
        let err = price(100.0, 100.0, 1.0, 0.5, 0.1, OptionType::Call, 1).unwrap_err();
        assert!(matches!(err, OptVolError::Numerical(_)));
    }
}
