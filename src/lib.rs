//! # optvol: Option Pricing and Volatility Surfaces
//!
//! A library for computing and comparing theoretical option prices with
//! two models, deriving sensitivities and implied volatility, and
//! interpolating an implied-volatility surface over strike/expiry space.
//!
//! ## Overview
//!
//! The two pricers are independent and order-insensitive; the
//! implied-volatility solver inverts the closed-form price; the surface
//! builder interpolates the solver's output onto a regular grid. Every
//! core computation is a pure, stateless function over scalar or
//! small-array inputs: no hidden state, no caches, no I/O.
//!
//! ## Key Components
//!
//! - **Black-Scholes**: closed-form European prices and analytic Greeks
//! - **Binomial Tree**: Cox-Ross-Rubinstein lattice converging to the
//!   closed form as the step count grows
//! - **Implied Volatility**: bounded derivative-free inversion of the
//!   Black-Scholes price
//! - **Surface**: thin-plate-spline interpolation of scattered implied
//!   vols onto a (strike, expiry) grid
//! - **Pricing**: per-record batch valuation with partial-failure
//!   semantics and the BS-vs-BT disagreement metric
//! - **Data**: Alpha Vantage bar fetching, CSV load/save, seeded
//!   synthetic demo fields
//!
//! ## Usage
//!
//! ```rust,no_run
//! use optvol::prelude::*;
//!
//! // Price an option both ways
//! let call = bs_price(100.0, 100.0, 1.0, 0.01, 0.2, OptionType::Call).unwrap();
//! let lattice = bt_price(100.0, 100.0, 1.0, 0.01, 0.2, OptionType::Call, 500).unwrap();
//!
//! // Recover the implied volatility of an observed price
//! let iv = implied_volatility(call, 100.0, 100.0, 1.0, 0.01, OptionType::Call,
//!     &IvConfig::default()).unwrap();
//! assert!(iv.converged);
//!
//! // Value a table of records and interpolate the surface
//! let records = synthesize_records(&synthetic_bars(250, 130.0, 7), 0);
//! let results = value_batch(&records, &ValuationConfig::default());
//! let (strikes, expiries, vols) = surface_inputs(&records, &results);
//! let surface = build_surface(&strikes, &expiries, &vols, &SurfaceConfig::default()).unwrap();
//! ```

pub mod core;
pub mod data;
pub mod models;
mod optim;
pub mod pricing;
pub mod surface;
pub mod viz;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        Greeks, OptVolError, OptVolResult, OptionRecord, OptionType, VolSurface,
    };

    // Data fetching and storage
    pub use crate::data::{
        load_records, read_records, save_valuations, synthesize_records, synthetic_bars,
        AlphaVantageClient, PriceBar, ValuationRow,
    };

    // Models
    pub use crate::models::binomial::{price as bt_price, DEFAULT_STEPS};
    pub use crate::models::black_scholes::{
        greeks as bs_greeks, norm_cdf, norm_pdf, price as bs_price,
    };
    pub use crate::models::implied_vol::{implied_volatility, IvConfig, IvSolution};

    // Batch valuation
    pub use crate::pricing::{
        mean_price_difference, price_difference_percent, surface_inputs, value_batch,
        value_record, Valuation, ValuationConfig,
    };

    // Surface building
    pub use crate::surface::{build_surface, SurfaceConfig};
}

// Re-export main types at crate root
pub use crate::core::{OptVolError, OptVolResult};
