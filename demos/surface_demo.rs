//! Example: Build and query a volatility surface from a batch of records
//!
//! Run with: cargo run --example surface_demo

use optvol::prelude::*;

fn main() -> OptVolResult<()> {
    // Synthetic market snapshot: deterministic, seeded per call
    let bars = synthetic_bars(250, 130.0, 7);
    let records = synthesize_records(&bars, 0);
    println!("Valuing {} records...", records.len());

    let results = value_batch(&records, &ValuationConfig::default());
    let ok_count = results.iter().filter(|r| r.is_ok()).count();
    println!("{ok_count} records valued");

    if let Some(mean) = mean_price_difference(&results) {
        println!("Mean BS-vs-BT price difference: {mean:.3}%");
    }

    // Interpolate the recovered implied vols onto a 50x50 grid
    let (strikes, expiries, vols) = surface_inputs(&records, &results);
    let config = SurfaceConfig {
        strike_points: 50,
        expiry_points: 50,
        ..Default::default()
    };
    let surface = build_surface(&strikes, &expiries, &vols, &config)?;

    println!(
        "\nSurface grid: {}x{} over strikes [{:.0}, {:.0}], expiries [{:.2}, {:.2}]",
        surface.strikes.len(),
        surface.expiries.len(),
        surface.strikes[0],
        surface.strikes[surface.strikes.len() - 1],
        surface.expiries[0],
        surface.expiries[surface.expiries.len() - 1],
    );

    // Query a few points off the grid nodes
    println!("\nInterpolated vols:");
    for (strike, expiry) in [(110.0, 0.25), (120.0, 0.5), (135.0, 0.75)] {
        match surface.interpolate(strike, expiry) {
            Some(vol) => println!("  K={strike:>6.1} T={expiry:.2}: {:.2}%", vol * 100.0),
            None => println!("  K={strike:>6.1} T={expiry:.2}: no data"),
        }
    }

    // A smile slice at fixed expiry
    if let Some(smile) = surface.smile_at(0.5) {
        let (k_lo, v_lo) = smile[0];
        let (k_hi, v_hi) = smile[smile.len() - 1];
        println!(
            "\nSmile at T=0.50: {:.2}% at K={k_lo:.0} ... {:.2}% at K={k_hi:.0}",
            v_lo * 100.0,
            v_hi * 100.0
        );
    }

    Ok(())
}
