//! Thin-plate-spline scattered-data interpolation.
//!
//! The 2-D analogue of the natural cubic spline: an exact interpolant
//! through irregular (x, y) → value samples, smooth everywhere, with an
//! affine polynomial part so constant and linear fields are reproduced
//! exactly. Coordinates are normalized to the unit square before fitting;
//! strike and expiry live on very different scales and the kernel is
//! isotropic.

use nalgebra::{DMatrix, DVector};

/// Thin-plate kernel U(r) = r² ln r, with U(0) = 0.
fn kernel(r_sq: f64) -> f64 {
    if r_sq <= 0.0 {
        0.0
    } else {
        // r² ln r = r² ln(r²) / 2
        0.5 * r_sq * r_sq.ln()
    }
}

/// Affine normalization of one axis: value -> (value - offset) / span.
#[derive(Debug, Clone, Copy)]
struct AxisScale {
    offset: f64,
    span: f64,
}

impl AxisScale {
    fn fit(values: impl Iterator<Item = f64> + Clone) -> Self {
        let min = values.clone().fold(f64::INFINITY, f64::min);
        let max = values.fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;
        Self {
            offset: min,
            span: if span > 0.0 { span } else { 1.0 },
        }
    }

    fn apply(&self, value: f64) -> f64 {
        (value - self.offset) / self.span
    }
}

/// Fitted thin-plate spline over scattered 2-D samples
#[derive(Debug, Clone)]
pub(crate) struct ThinPlateSpline {
    /// Sample sites in normalized coordinates
    sites: Vec<(f64, f64)>,
    /// Kernel weights (one per site) followed by the affine coefficients
    /// (constant, x, y)
    weights: DVector<f64>,
    x_scale: AxisScale,
    y_scale: AxisScale,
}

impl ThinPlateSpline {
    /// Fit an interpolating spline through `(xs[i], ys[i]) -> values[i]`.
    ///
    /// Returns `None` when the system is singular (duplicate or collinear
    /// sites, or too few of them). Callers are expected to have screened
    /// for those, so `None` here means the screen missed a degeneracy.
    pub fn fit(xs: &[f64], ys: &[f64], values: &[f64]) -> Option<Self> {
        let n = xs.len();
        if n < 3 || ys.len() != n || values.len() != n {
            return None;
        }

        let x_scale = AxisScale::fit(xs.iter().copied());
        let y_scale = AxisScale::fit(ys.iter().copied());
        let sites: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| (x_scale.apply(x), y_scale.apply(y)))
            .collect();

        // [ K  P ] [w]   [v]
        // [ Pᵀ 0 ] [c] = [0]   with K the kernel matrix, P = [1 x y]
        let dim = n + 3;
        let mut a = DMatrix::<f64>::zeros(dim, dim);
        for i in 0..n {
            for j in 0..n {
                let dx = sites[i].0 - sites[j].0;
                let dy = sites[i].1 - sites[j].1;
                a[(i, j)] = kernel(dx * dx + dy * dy);
            }
            a[(i, n)] = 1.0;
            a[(i, n + 1)] = sites[i].0;
            a[(i, n + 2)] = sites[i].1;
            a[(n, i)] = 1.0;
            a[(n + 1, i)] = sites[i].0;
            a[(n + 2, i)] = sites[i].1;
        }

        let mut rhs = DVector::<f64>::zeros(dim);
        for (i, &v) in values.iter().enumerate() {
            rhs[i] = v;
        }

        let weights = a.lu().solve(&rhs)?;
        if weights.iter().any(|w| !w.is_finite()) {
            return None;
        }

        Some(Self {
            sites,
            weights,
            x_scale,
            y_scale,
        })
    }

    /// Evaluate the spline at (x, y) in original coordinates
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let px = self.x_scale.apply(x);
        let py = self.y_scale.apply(y);
        let n = self.sites.len();

        let mut value = self.weights[n] + self.weights[n + 1] * px + self.weights[n + 2] * py;
        for (i, &(sx, sy)) in self.sites.iter().enumerate() {
            let dx = px - sx;
            let dy = py - sy;
            value += self.weights[i] * kernel(dx * dx + dy * dy);
        }
        value
    }
}
