//! Volatility Surface Builder
//!
//! Interpolates scattered per-record implied volatilities onto a regular
//! (strike, expiry) grid spanning the data's bounding box.
//!
//! The interpolant is a thin-plate spline, which matches every sample
//! exactly and is defined on the whole grid, so cells outside the convex
//! hull of the samples receive the spline's smooth extension instead of a
//! hole, clamped to the observed volatility range so mild extrapolation
//! stays physical. Degenerate inputs (fewer than four distinct sites, or
//! sites on a single line) cannot support a 2-D interpolant; they fail
//! with `InsufficientData`, or collapse to nearest-neighbor lookup when
//! [`SurfaceConfig::nearest_fallback`] is set.

mod spline;

use ndarray::{Array1, Array2};
use std::collections::BTreeMap;
use tracing::warn;

use crate::core::{OptVolError, OptVolResult, VolSurface};
use spline::ThinPlateSpline;

/// Grid resolution and degenerate-input policy
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Grid cells along the strike axis
    pub strike_points: usize,
    /// Grid cells along the expiry axis
    pub expiry_points: usize,
    /// Fall back to nearest-neighbor lookup on degenerate input instead of
    /// failing with `InsufficientData`
    pub nearest_fallback: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            strike_points: 100,
            expiry_points: 100,
            nearest_fallback: false,
        }
    }
}

/// One deduplicated interpolation site
#[derive(Debug, Clone, Copy)]
struct Sample {
    strike: f64,
    expiry: f64,
    vol: f64,
}

/// Build an interpolated volatility surface from parallel slices of
/// strike, expiry and implied volatility (one triple per option record).
///
/// Non-finite volatilities are dropped with a warning; repeated
/// (strike, expiry) sites are averaged. The grid spans
/// `[min(strike), max(strike)] × [min(expiry), max(expiry)]`.
pub fn build_surface(
    strikes: &[f64],
    expiries: &[f64],
    vols: &[f64],
    config: &SurfaceConfig,
) -> OptVolResult<VolSurface> {
    if strikes.len() != expiries.len() || strikes.len() != vols.len() {
        return Err(OptVolError::invalid_input(format!(
            "mismatched input lengths: {} strikes, {} expiries, {} vols",
            strikes.len(),
            expiries.len(),
            vols.len()
        )));
    }
    if config.strike_points < 2 || config.expiry_points < 2 {
        return Err(OptVolError::invalid_input(
            "surface grid needs at least 2 points per axis",
        ));
    }

    let samples = collect_samples(strikes, expiries, vols);
    let degenerate = samples.len() < 4 || collinear(&samples);

    if degenerate && !config.nearest_fallback {
        return Err(OptVolError::insufficient_data(format!(
            "{} distinct usable sites; interpolation needs at least 4 non-collinear (strike, expiry) points",
            samples.len()
        )));
    }
    if samples.is_empty() {
        return Err(OptVolError::insufficient_data(
            "no finite volatility samples",
        ));
    }

    let (strike_axis, expiry_axis) = grid_axes(&samples, config);

    let grid = if degenerate {
        warn!(
            sites = samples.len(),
            "degenerate surface input, using nearest-neighbor fallback"
        );
        nearest_neighbor_grid(&samples, &strike_axis, &expiry_axis)
    } else {
        let xs: Vec<f64> = samples.iter().map(|s| s.strike).collect();
        let ys: Vec<f64> = samples.iter().map(|s| s.expiry).collect();
        let vs: Vec<f64> = samples.iter().map(|s| s.vol).collect();

        match ThinPlateSpline::fit(&xs, &ys, &vs) {
            Some(spline) => spline_grid(&spline, &samples, &strike_axis, &expiry_axis),
            None if config.nearest_fallback => {
                warn!("singular interpolation system, using nearest-neighbor fallback");
                nearest_neighbor_grid(&samples, &strike_axis, &expiry_axis)
            }
            None => {
                return Err(OptVolError::insufficient_data(
                    "interpolation system is singular for these sites",
                ))
            }
        }
    };

    Ok(VolSurface::new(strike_axis, expiry_axis, grid))
}

/// Drop non-finite entries and average duplicate (strike, expiry) sites
fn collect_samples(strikes: &[f64], expiries: &[f64], vols: &[f64]) -> Vec<Sample> {
    let mut dropped = 0usize;
    let mut by_site: BTreeMap<(u64, u64), (f64, f64, f64, usize)> = BTreeMap::new();

    for ((&strike, &expiry), &vol) in strikes.iter().zip(expiries).zip(vols) {
        if !strike.is_finite() || !expiry.is_finite() || !vol.is_finite() {
            dropped += 1;
            continue;
        }
        let entry = by_site
            .entry((strike.to_bits(), expiry.to_bits()))
            .or_insert((strike, expiry, 0.0, 0));
        entry.2 += vol;
        entry.3 += 1;
    }

    if dropped > 0 {
        warn!(dropped, "dropped non-finite surface samples");
    }

    by_site
        .into_values()
        .map(|(strike, expiry, vol_sum, count)| Sample {
            strike,
            expiry,
            vol: vol_sum / count as f64,
        })
        .collect()
}

/// Are all sites on a single line in normalized (strike, expiry) space?
fn collinear(samples: &[Sample]) -> bool {
    if samples.len() < 3 {
        return true;
    }

    let k_span = span(samples.iter().map(|s| s.strike));
    let t_span = span(samples.iter().map(|s| s.expiry));
    let norm = |s: &Sample| {
        (
            (s.strike - samples[0].strike) / k_span,
            (s.expiry - samples[0].expiry) / t_span,
        )
    };

    // First site not collapsed onto sample 0 defines the direction
    let base = samples[1..]
        .iter()
        .map(norm)
        .find(|(dx, dy)| dx.hypot(*dy) > 1e-9);
    let Some((bx, by)) = base else {
        return true;
    };

    samples
        .iter()
        .map(norm)
        .all(|(dx, dy)| (bx * dy - by * dx).abs() < 1e-9)
}

fn span(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let min = values.clone().fold(f64::INFINITY, f64::min);
    let max = values.fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if span > 0.0 {
        span
    } else {
        1.0
    }
}

fn grid_axes(samples: &[Sample], config: &SurfaceConfig) -> (Array1<f64>, Array1<f64>) {
    let k_min = samples.iter().map(|s| s.strike).fold(f64::INFINITY, f64::min);
    let k_max = samples
        .iter()
        .map(|s| s.strike)
        .fold(f64::NEG_INFINITY, f64::max);
    let t_min = samples.iter().map(|s| s.expiry).fold(f64::INFINITY, f64::min);
    let t_max = samples
        .iter()
        .map(|s| s.expiry)
        .fold(f64::NEG_INFINITY, f64::max);

    (
        Array1::linspace(k_min, k_max, config.strike_points),
        Array1::linspace(t_min, t_max, config.expiry_points),
    )
}

/// Evaluate the fitted spline over the grid, clamped to the observed
/// volatility range
fn spline_grid(
    spline: &ThinPlateSpline,
    samples: &[Sample],
    strike_axis: &Array1<f64>,
    expiry_axis: &Array1<f64>,
) -> Array2<f64> {
    let v_min = samples.iter().map(|s| s.vol).fold(f64::INFINITY, f64::min);
    let v_max = samples
        .iter()
        .map(|s| s.vol)
        .fold(f64::NEG_INFINITY, f64::max);

    Array2::from_shape_fn((strike_axis.len(), expiry_axis.len()), |(i, j)| {
        spline
            .evaluate(strike_axis[i], expiry_axis[j])
            .clamp(v_min, v_max)
    })
}

/// Nearest sample by normalized distance, for the degenerate fallback
fn nearest_neighbor_grid(
    samples: &[Sample],
    strike_axis: &Array1<f64>,
    expiry_axis: &Array1<f64>,
) -> Array2<f64> {
    let k_span = span(samples.iter().map(|s| s.strike));
    let t_span = span(samples.iter().map(|s| s.expiry));

    Array2::from_shape_fn((strike_axis.len(), expiry_axis.len()), |(i, j)| {
        samples
            .iter()
            .map(|s| {
                let dk = (s.strike - strike_axis[i]) / k_span;
                let dt = (s.expiry - expiry_axis[j]) / t_span;
                (dk * dk + dt * dt, s.vol)
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, vol)| vol)
            .unwrap_or(f64::NAN)
    })
}
