//! Core data types for optvol
//!
//! Defines fundamental types:
//! - OptionRecord: one valuation request (spot, strike, expiry, rate, vol, type)
//! - Greeks: price sensitivities
//! - VolSurface: interpolated implied-volatility grid
//! - OptVolError: crate-wide error taxonomy

pub mod error;
pub mod greeks;
pub mod record;
pub mod surface;

pub use error::*;
pub use greeks::*;
pub use record::*;
pub use surface::*;
