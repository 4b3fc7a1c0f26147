//! optvol CLI
//!
//! Runs the full pipeline: daily bars (fetched, or synthetic when no API
//! key is available), demo option fields, batch valuation with both
//! models, model comparison, CSV output, surface construction and chart
//! rendering.

use std::path::PathBuf;

use optvol::prelude::*;
use optvol::viz;

fn main() {
    tracing_subscriber::fmt::init();

    println!("optvol Pricing Pipeline");
    println!("=======================\n");

    let symbol = std::env::args().nth(1).unwrap_or_else(|| "AAPL".to_string());

    // Single-option walkthrough
    let (spot, strike, time, rate, vol) = (100.0, 100.0, 1.0, 0.01, 0.20);
    println!("Black-Scholes Pricing Example:");
    println!("  Spot: ${spot:.2}  Strike: ${strike:.2}  T: {time:.2}y  r: {:.1}%  Vol: {:.1}%\n", rate * 100.0, vol * 100.0);

    match (
        bs_price(spot, strike, time, rate, vol, OptionType::Call),
        bt_price(spot, strike, time, rate, vol, OptionType::Call, DEFAULT_STEPS),
    ) {
        (Ok(bs), Ok(bt)) => {
            println!("  Black-Scholes call: ${bs:.4}");
            println!("  Binomial call ({DEFAULT_STEPS} steps): ${bt:.4}");
        }
        (Err(e), _) | (_, Err(e)) => println!("  Pricing failed: {e}"),
    }

    if let Ok(greeks) = bs_greeks(spot, strike, time, rate, vol, OptionType::Call) {
        println!("\nCall Greeks:");
        println!("  Delta: {:.4}", greeks.delta);
        println!("  Gamma: {:.6}", greeks.gamma);
        println!("  Theta: {:.4}", greeks.theta);
        println!("  Vega:  {:.4}", greeks.vega);
        println!("  Rho:   {:.4}", greeks.rho);
    }

    // Market data: live if a key is present, synthetic otherwise
    println!("\n--- Market Data ({symbol}) ---");
    let bars = match std::env::var("ALPHAVANTAGE_API_KEY") {
        Ok(key) => match AlphaVantageClient::new(key).daily_bars(&symbol) {
            Ok(bars) => {
                println!("Fetched {} daily bars", bars.len());
                bars
            }
            Err(e) => {
                println!("Fetch failed ({e}), falling back to synthetic bars");
                synthetic_bars(250, 130.0, 7)
            }
        },
        Err(_) => {
            println!("ALPHAVANTAGE_API_KEY not set, using synthetic bars");
            synthetic_bars(250, 130.0, 7)
        }
    };

    let records = synthesize_records(&bars, 0);
    println!("Valuing {} option records...\n", records.len());

    // Batch valuation: per-record results, failures don't abort the rest
    let config = ValuationConfig::default();
    let results = value_batch(&records, &config);
    let ok_count = results.iter().filter(|r| r.is_ok()).count();
    println!("Valued {ok_count}/{} records", results.len());

    if let Some(mean) = mean_price_difference(&results) {
        println!(
            "The average difference between the Black-Scholes price and the Binomial Tree price is {mean:.2}%"
        );
    }

    // Persist the enriched table
    let data_dir = PathBuf::from("data");
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        println!("Could not create data directory: {e}");
        return;
    }
    let csv_path = data_dir.join(format!("{symbol}_processed_option_data.csv"));
    match save_valuations(&csv_path, &records, &results) {
        Ok(written) => println!("Saved {written} valuation rows to {}", csv_path.display()),
        Err(e) => println!("Could not save valuations: {e}"),
    }

    // Volatility surface from the recovered implied vols
    let (strikes, expiries, vols) = surface_inputs(&records, &results);
    let surface = match build_surface(&strikes, &expiries, &vols, &SurfaceConfig::default()) {
        Ok(surface) => {
            println!(
                "Built {}x{} volatility surface over strikes [{:.1}, {:.1}] and expiries [{:.2}, {:.2}]",
                surface.strikes.len(),
                surface.expiries.len(),
                surface.strikes[0],
                surface.strikes[surface.strikes.len() - 1],
                surface.expiries[0],
                surface.expiries[surface.expiries.len() - 1],
            );
            Some(surface)
        }
        Err(e) => {
            println!("Surface construction failed: {e}");
            None
        }
    };

    // Charts are best-effort: a headless environment without fonts should
    // not fail the pipeline
    let prices: Vec<(f64, f64)> = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(|v| (v.bs_price, v.bt_price))
        .collect();
    let diffs: Vec<f64> = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(price_difference_percent)
        .collect();

    let comparison_path = data_dir.join(format!("{symbol}_price_comparison.png"));
    match viz::render_price_comparison(&prices, &comparison_path) {
        Ok(()) => println!("Rendered {}", comparison_path.display()),
        Err(e) => println!("Skipped price comparison chart: {e}"),
    }

    let diff_path = data_dir.join(format!("{symbol}_price_difference.png"));
    match viz::render_price_difference(&diffs, &diff_path) {
        Ok(()) => println!("Rendered {}", diff_path.display()),
        Err(e) => println!("Skipped price difference chart: {e}"),
    }

    if let Some(surface) = surface {
        let surface_path = data_dir.join(format!("{symbol}_volatility_surface.png"));
        match viz::render_surface_heatmap(&surface, &surface_path) {
            Ok(()) => println!("Rendered {}", surface_path.display()),
            Err(e) => println!("Skipped surface heatmap: {e}"),
        }
    }
}
