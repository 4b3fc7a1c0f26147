//! Example: Basic option pricing with both models
//!
//! Run with: cargo run --example basic_pricing

use optvol::prelude::*;

fn main() -> OptVolResult<()> {
    // Option parameters
    let spot = 100.0;
    let strike = 105.0;
    let time = 0.25; // 3 months
    let rate = 0.01; // 1% risk-free rate
    let vol = 0.20; // 20% volatility

    println!("=== Black-Scholes vs Binomial Tree ===\n");
    println!("Spot:   ${spot:.2}");
    println!("Strike: ${strike:.2}");
    println!("Time:   {time:.2} years ({:.0} days)", time * 365.0);
    println!("Rate:   {:.1}%", rate * 100.0);
    println!("Vol:    {:.1}%\n", vol * 100.0);

    let call = bs_price(spot, strike, time, rate, vol, OptionType::Call)?;
    let put = bs_price(spot, strike, time, rate, vol, OptionType::Put)?;
    println!("Black-Scholes call: ${call:.4}");
    println!("Black-Scholes put:  ${put:.4}");

    // Verify put-call parity: C - P = S - K*e^(-rT)
    let parity = spot - strike * (-rate * time).exp();
    println!("\nPut-Call Parity Check:");
    println!("  C - P            = {:.6}", call - put);
    println!("  S - K*e^(-rT)    = {parity:.6}");

    // The lattice closes in on the closed form as steps grow
    println!("\nBinomial convergence:");
    for steps in [10, 50, 100, 500, 2000] {
        let bt = bt_price(spot, strike, time, rate, vol, OptionType::Call, steps)?;
        println!("  {steps:>5} steps: ${bt:.4}  (error {:+.5})", bt - call);
    }

    // Greeks
    let greeks = bs_greeks(spot, strike, time, rate, vol, OptionType::Call)?;
    println!("\n=== Greeks (Call) ===\n");
    println!("Delta: {:.4}", greeks.delta);
    println!("Gamma: {:.4}", greeks.gamma);
    println!("Theta: {:.4} (per day: {:.4})", greeks.theta, greeks.theta / 365.0);
    println!("Vega:  {:.4}", greeks.vega);
    println!("Rho:   {:.4}", greeks.rho);

    // Implied volatility round trip
    println!("\n=== Implied Volatility ===\n");
    let solution = implied_volatility(
        call,
        spot,
        strike,
        time,
        rate,
        OptionType::Call,
        &IvConfig::default(),
    )?;
    println!(
        "Recovered IV: {:.2}% (input: {:.2}%, converged: {})",
        solution.sigma * 100.0,
        vol * 100.0,
        solution.converged
    );

    Ok(())
}
