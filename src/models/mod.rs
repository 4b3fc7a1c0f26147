//! Pricing Models
//!
//! Implements:
//! - Black-Scholes (closed-form price, analytic Greeks)
//! - Cox-Ross-Rubinstein binomial lattice (converges to Black-Scholes)
//! - Implied volatility (bounded inversion of the Black-Scholes price)
//!
//! Both pricers expose a `price` function; call them path-qualified
//! (`black_scholes::price`, `binomial::price`) or through the prelude
//! aliases `bs_price`/`bt_price`.

pub mod binomial;
pub mod black_scholes;
pub mod implied_vol;

pub use binomial::DEFAULT_STEPS;
pub use black_scholes::{norm_cdf, norm_pdf};
pub use implied_vol::{implied_volatility, IvConfig, IvSolution};
