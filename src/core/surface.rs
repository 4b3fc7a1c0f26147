//! Volatility Surface
//!
//! A rectangular implied-volatility grid over (strike, expiry), built fresh
//! on each request from a snapshot of option records. The surface owns its
//! axes and values; nothing here references the records it was built from.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Interpolated implied-volatility grid over (strike, expiry)
///
/// `vols[[i, j]]` is the volatility at `strikes[i]`, `expiries[j]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolSurface {
    /// Strike axis, ascending
    pub strikes: Array1<f64>,
    /// Expiry axis in years, ascending
    pub expiries: Array1<f64>,
    /// Volatility grid, shape `(strikes.len(), expiries.len())`
    pub vols: Array2<f64>,
}

impl VolSurface {
    pub fn new(strikes: Array1<f64>, expiries: Array1<f64>, vols: Array2<f64>) -> Self {
        debug_assert_eq!(vols.dim(), (strikes.len(), expiries.len()));
        Self {
            strikes,
            expiries,
            vols,
        }
    }

    /// Strike coordinate of every grid cell, same shape as `vols`
    pub fn strike_mesh(&self) -> Array2<f64> {
        let (n, m) = self.vols.dim();
        Array2::from_shape_fn((n, m), |(i, _)| self.strikes[i])
    }

    /// Expiry coordinate of every grid cell, same shape as `vols`
    pub fn expiry_mesh(&self) -> Array2<f64> {
        let (n, m) = self.vols.dim();
        Array2::from_shape_fn((n, m), |(_, j)| self.expiries[j])
    }

    /// Interpolate volatility at (strike, expiry)
    ///
    /// Bilinear between the four surrounding grid cells; queries outside
    /// the grid are clamped to the boundary.
    pub fn interpolate(&self, strike: f64, expiry: f64) -> Option<f64> {
        let (xi_lo, xi_hi, x_frac) = find_bracket(self.strikes.as_slice()?, strike)?;
        let (yi_lo, yi_hi, y_frac) = find_bracket(self.expiries.as_slice()?, expiry)?;

        let v00 = self.vols[[xi_lo, yi_lo]];
        let v10 = self.vols[[xi_hi, yi_lo]];
        let v01 = self.vols[[xi_lo, yi_hi]];
        let v11 = self.vols[[xi_hi, yi_hi]];

        let v0 = v00 * (1.0 - x_frac) + v10 * x_frac;
        let v1 = v01 * (1.0 - x_frac) + v11 * x_frac;

        Some(v0 * (1.0 - y_frac) + v1 * y_frac)
    }

    /// Volatility smile at a given expiry: (strike, vol) pairs
    pub fn smile_at(&self, expiry: f64) -> Option<Vec<(f64, f64)>> {
        let (yi_lo, yi_hi, y_frac) = find_bracket(self.expiries.as_slice()?, expiry)?;

        let smile = self
            .strikes
            .iter()
            .enumerate()
            .map(|(xi, &strike)| {
                let v_lo = self.vols[[xi, yi_lo]];
                let v_hi = self.vols[[xi, yi_hi]];
                (strike, v_lo * (1.0 - y_frac) + v_hi * y_frac)
            })
            .collect();

        Some(smile)
    }
}

/// Find bracketing indices and interpolation fraction along an axis
fn find_bracket(axis: &[f64], value: f64) -> Option<(usize, usize, f64)> {
    if axis.is_empty() {
        return None;
    }

    // Clamp to bounds
    if value <= axis[0] {
        return Some((0, 0, 0.0));
    }
    if value >= axis[axis.len() - 1] {
        let last = axis.len() - 1;
        return Some((last, last, 0.0));
    }

    for i in 0..axis.len() - 1 {
        if value >= axis[i] && value <= axis[i + 1] {
            let frac = (value - axis[i]) / (axis[i + 1] - axis[i]);
            return Some((i, i + 1, frac));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    fn flat_surface() -> VolSurface {
        let strikes = arr1(&[90.0, 95.0, 100.0, 105.0, 110.0]);
        let expiries = arr1(&[0.25, 0.5, 1.0]);
        let vols = Array2::from_elem((5, 3), 0.20);
        VolSurface::new(strikes, expiries, vols)
    }

    #[test]
    fn test_flat_interpolation() {
        let surface = flat_surface();
        let vol = surface.interpolate(102.0, 0.4).unwrap();
        assert!((vol - 0.20).abs() < 1e-12);
    }

    #[test]
    fn test_interpolation_clamps_outside_grid() {
        let surface = flat_surface();
        assert!((surface.interpolate(50.0, 0.4).unwrap() - 0.20).abs() < 1e-12);
        assert!((surface.interpolate(200.0, 5.0).unwrap() - 0.20).abs() < 1e-12);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let strikes = arr1(&[100.0, 110.0]);
        let expiries = arr1(&[0.5, 1.0]);
        let vols = Array2::from_shape_vec((2, 2), vec![0.2, 0.2, 0.4, 0.4]).unwrap();
        let surface = VolSurface::new(strikes, expiries, vols);

        // Halfway along the strike axis, constant along expiry
        let vol = surface.interpolate(105.0, 0.75).unwrap();
        assert!((vol - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_meshes_match_grid_shape() {
        let surface = flat_surface();
        assert_eq!(surface.strike_mesh().dim(), surface.vols.dim());
        assert_eq!(surface.expiry_mesh().dim(), surface.vols.dim());
        assert_eq!(surface.strike_mesh()[[3, 1]], 105.0);
        assert_eq!(surface.expiry_mesh()[[3, 1]], 0.5);
    }

    #[test]
    fn test_smile_at() {
        let surface = flat_surface();
        let smile = surface.smile_at(0.5).unwrap();
        assert_eq!(smile.len(), 5);
        assert!(smile.iter().all(|&(_, v)| (v - 0.20).abs() < 1e-12));
    }
}
