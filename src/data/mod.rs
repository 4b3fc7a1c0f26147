//! Data fetching and storage
//!
//! Handles:
//! - Alpha Vantage API for daily price bars
//! - CSV loading/saving of option records and valuation results
//! - Synthetic demo fields with per-call seeded randomness

pub mod fetch;
pub mod loader;
pub mod synth;

pub use fetch::*;
pub use loader::*;
pub use synth::*;
