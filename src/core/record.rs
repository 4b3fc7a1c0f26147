//! Option record definitions
//!
//! An [`OptionRecord`] is one valuation request: the market inputs for a
//! single European option, keyed by an optional observation date that is
//! carried through but never interpreted by the pricing code.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Option type (Call or Put)
///
/// Serialized lowercase (`call`/`put`) to match the tabular input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

/// One option valuation request
///
/// All pricing preconditions (S > 0, K > 0, T > 0, σ > 0) are enforced at
/// the pricer boundary, not here: a record loaded from a file may be
/// invalid, and batch valuation reports that per record instead of
/// rejecting the whole table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OptionRecord {
    /// Observation date (row identifier, carried through)
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Current spot price of the underlying (S)
    #[serde(alias = "close")]
    pub underlying_price: f64,
    /// Strike price (K)
    pub strike_price: f64,
    /// Time to expiry in years (T)
    pub time_to_expiry: f64,
    /// Annualized volatility (σ)
    pub volatility: f64,
    /// Continuously-compounded annual risk-free rate (r)
    pub risk_free_rate: f64,
    /// Call or put
    pub option_type: OptionType,
}

impl OptionRecord {
    /// Create a record without a date identifier
    pub fn new(
        underlying_price: f64,
        strike_price: f64,
        time_to_expiry: f64,
        volatility: f64,
        risk_free_rate: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            date: None,
            underlying_price,
            strike_price,
            time_to_expiry,
            volatility,
            risk_free_rate,
            option_type,
        }
    }

    /// Log-moneyness: ln(K/S)
    pub fn log_moneyness(&self) -> f64 {
        (self.strike_price / self.underlying_price).ln()
    }

    /// Is this option in the money at its recorded spot?
    pub fn is_itm(&self) -> bool {
        match self.option_type {
            OptionType::Call => self.underlying_price > self.strike_price,
            OptionType::Put => self.underlying_price < self.strike_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type() {
        assert_eq!(OptionType::Call.phi(), 1.0);
        assert_eq!(OptionType::Put.phi(), -1.0);

        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
    }

    #[test]
    fn test_option_type_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&OptionType::Call).unwrap(),
            "\"call\""
        );
        let put: OptionType = serde_json::from_str("\"put\"").unwrap();
        assert_eq!(put, OptionType::Put);

        // Anything outside {call, put} is rejected at the boundary
        assert!(serde_json::from_str::<OptionType>("\"straddle\"").is_err());
    }

    #[test]
    fn test_moneyness() {
        let rec = OptionRecord::new(110.0, 100.0, 0.5, 0.2, 0.01, OptionType::Call);
        assert!(rec.is_itm());
        assert!(rec.log_moneyness() < 0.0);

        let rec = OptionRecord::new(90.0, 100.0, 0.5, 0.2, 0.01, OptionType::Call);
        assert!(!rec.is_itm());
    }
}
