//! Chart rendering
//!
//! Static renders of the pipeline outputs: model price comparison,
//! price-difference series, and the interpolated volatility surface.
//! Thin wrappers over `plotters`; no algorithmic content.

use plotters::prelude::*;
use std::path::Path;

use crate::core::{OptVolError, OptVolResult, VolSurface};

fn render_err(e: impl std::fmt::Display) -> OptVolError {
    OptVolError::Data(format!("chart rendering failed: {e}"))
}

/// Line chart of Black-Scholes vs binomial prices per record
pub fn render_price_comparison(prices: &[(f64, f64)], path: impl AsRef<Path>) -> OptVolResult<()> {
    if prices.is_empty() {
        return Err(OptVolError::insufficient_data("no prices to plot"));
    }

    let root = BitMapBackend::new(path.as_ref(), (800, 400)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let y_max = prices
        .iter()
        .map(|&(bs, bt)| bs.max(bt))
        .fold(0.0, f64::max)
        * 1.05;
    let mut chart = ChartBuilder::on(&root)
        .caption("Option Prices: Black-Scholes vs Binomial Tree", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(0..prices.len() as i32, 0.0..y_max)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .x_desc("Record")
        .y_desc("Option Price")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            prices.iter().enumerate().map(|(i, &(bs, _))| (i as i32, bs)),
            &BLUE,
        ))
        .map_err(render_err)?
        .label("Black-Scholes")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart
        .draw_series(LineSeries::new(
            prices.iter().enumerate().map(|(i, &(_, bt))| (i as i32, bt)),
            &RED,
        ))
        .map_err(render_err)?
        .label("Binomial Tree")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;
    root.present().map_err(render_err)?;
    Ok(())
}

/// Line chart of the per-record |BS − BT| / BS percentage
pub fn render_price_difference(diffs: &[f64], path: impl AsRef<Path>) -> OptVolResult<()> {
    if diffs.is_empty() {
        return Err(OptVolError::insufficient_data("no differences to plot"));
    }

    let root = BitMapBackend::new(path.as_ref(), (800, 400)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let y_max = diffs.iter().copied().fold(0.0, f64::max) * 1.05;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Price Difference: Black-Scholes vs Binomial Tree",
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(0..diffs.len() as i32, 0.0..y_max.max(1e-6))
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .x_desc("Record")
        .y_desc("Difference (%)")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            diffs.iter().enumerate().map(|(i, &d)| (i as i32, d)),
            &GREEN,
        ))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Heatmap of the interpolated volatility surface
pub fn render_surface_heatmap(surface: &VolSurface, path: impl AsRef<Path>) -> OptVolResult<()> {
    let (n, m) = surface.vols.dim();
    if n < 2 || m < 2 {
        return Err(OptVolError::insufficient_data(
            "surface grid too small to plot",
        ));
    }

    let v_min = surface.vols.iter().copied().fold(f64::INFINITY, f64::min);
    let v_max = surface
        .vols
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    let root = BitMapBackend::new(path.as_ref(), (800, 400)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let k0 = surface.strikes[0];
    let k1 = surface.strikes[n - 1];
    let t0 = surface.expiries[0];
    let t1 = surface.expiries[m - 1];
    let mut chart = ChartBuilder::on(&root)
        .caption("Implied Volatility Surface", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(k0..k1, t0..t1)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Strike Price")
        .y_desc("Time to Expiry")
        .draw()
        .map_err(render_err)?;

    let dk = (k1 - k0) / (n - 1) as f64;
    let dt = (t1 - t0) / (m - 1) as f64;
    chart
        .draw_series((0..n).flat_map(|i| {
            (0..m).map(move |j| {
                let k = surface.strikes[i];
                let t = surface.expiries[j];
                let color = heat_color(surface.vols[[i, j]], v_min, v_max);
                Rectangle::new(
                    [
                        (k - dk / 2.0, t - dt / 2.0),
                        (k + dk / 2.0, t + dt / 2.0),
                    ],
                    color.filled(),
                )
            })
        }))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Dark-blue → teal → yellow gradient over the value range
fn heat_color(value: f64, min: f64, max: f64) -> RGBColor {
    let span = max - min;
    let frac = if span > 0.0 {
        ((value - min) / span).clamp(0.0, 1.0)
    } else {
        0.5
    };

    let lerp = |a: u8, b: u8, t: f64| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    if frac < 0.5 {
        let t = frac * 2.0;
        RGBColor(lerp(68, 33, t), lerp(1, 145, t), lerp(84, 140, t))
    } else {
        let t = (frac - 0.5) * 2.0;
        RGBColor(lerp(33, 253, t), lerp(145, 231, t), lerp(140, 37, t))
    }
}
