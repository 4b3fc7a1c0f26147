//! Tabular storage
//!
//! Reads option records from, and writes valuation results to, delimited
//! files. This is the flat row-set boundary of the system; the pricing
//! code itself never touches the filesystem.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{OptVolError, OptVolResult, OptionRecord, OptionType};
use crate::pricing::{price_difference_percent, Valuation};

/// Load option records from a CSV file
///
/// Expected columns: `close` (or `underlying_price`), `strike_price`,
/// `time_to_expiry`, `volatility`, `risk_free_rate`, `option_type`, with an
/// optional leading `date`. A missing file or column is a data error, not a
/// panic.
pub fn load_records(path: impl AsRef<Path>) -> OptVolResult<Vec<OptionRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(OptVolError::data(format!(
            "file {} does not exist",
            path.display()
        )));
    }

    let records = read_records(File::open(path)?)?;
    info!(count = records.len(), path = %path.display(), "loaded option records");
    Ok(records)
}

/// Parse option records from any CSV reader
pub fn read_records<R: Read>(reader: R) -> OptVolResult<Vec<OptionRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize()
        .map(|row| row.map_err(|e| OptVolError::data(format!("invalid option record: {e}"))))
        .collect()
}

/// One flat output row: the input record merged with its derived values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationRow {
    pub date: Option<NaiveDate>,
    pub underlying_price: f64,
    pub strike_price: f64,
    pub time_to_expiry: f64,
    pub volatility: f64,
    pub risk_free_rate: f64,
    pub option_type: OptionType,
    #[serde(rename = "BS_Price")]
    pub bs_price: f64,
    #[serde(rename = "BT_Price")]
    pub bt_price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
    /// Empty when the solver found no reliable implied volatility
    pub implied_volatility: Option<f64>,
    #[serde(rename = "Price_Difference_Percent")]
    pub price_difference_percent: f64,
}

impl ValuationRow {
    pub fn new(record: &OptionRecord, valuation: &Valuation) -> Self {
        Self {
            date: record.date,
            underlying_price: record.underlying_price,
            strike_price: record.strike_price,
            time_to_expiry: record.time_to_expiry,
            volatility: record.volatility,
            risk_free_rate: record.risk_free_rate,
            option_type: record.option_type,
            bs_price: valuation.bs_price,
            bt_price: valuation.bt_price,
            delta: valuation.greeks.delta,
            gamma: valuation.greeks.gamma,
            theta: valuation.greeks.theta,
            vega: valuation.greeks.vega,
            rho: valuation.greeks.rho,
            implied_volatility: valuation.implied_vol.as_ref().map(|s| s.sigma),
            price_difference_percent: price_difference_percent(valuation),
        }
    }
}

/// Write the successful rows of a valued batch as CSV, returning how many
/// were written (failed records are skipped, preserving partial-failure
/// semantics end to end)
pub fn save_valuations(
    path: impl AsRef<Path>,
    records: &[OptionRecord],
    results: &[OptVolResult<Valuation>],
) -> OptVolResult<usize> {
    let path = path.as_ref();
    let written = write_valuations(File::create(path)?, records, results)?;
    info!(
        written,
        skipped = records.len() - written,
        path = %path.display(),
        "wrote valuation rows"
    );
    Ok(written)
}

/// Serialize valuation rows to any writer
pub fn write_valuations<W: Write>(
    writer: W,
    records: &[OptionRecord],
    results: &[OptVolResult<Valuation>],
) -> OptVolResult<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut written = 0;

    for (record, result) in records.iter().zip(results) {
        if let Ok(valuation) = result {
            csv_writer.serialize(ValuationRow::new(record, valuation))?;
            written += 1;
        }
    }

    csv_writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{value_batch, ValuationConfig};

    const CSV_INPUT: &str = "\
date,close,strike_price,time_to_expiry,volatility,risk_free_rate,option_type
2024-03-01,104.5,100.0,0.25,0.22,0.01,call
2024-03-04,103.1,110.0,0.5,0.3,0.01,put
";

    #[test]
    fn test_read_records() {
        let records = read_records(CSV_INPUT.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].underlying_price, 104.5);
        assert_eq!(records[0].option_type, OptionType::Call);
        assert_eq!(
            records[1].date,
            Some(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
        );
        assert_eq!(records[1].option_type, OptionType::Put);
    }

    #[test]
    fn test_missing_column_is_data_error() {
        let malformed = "date,close,strike_price\n2024-03-01,104.5,100.0\n";
        let err = read_records(malformed.as_bytes()).unwrap_err();
        assert!(matches!(err, OptVolError::Data(_)));
    }

    #[test]
    fn test_unknown_option_type_is_data_error() {
        let malformed = CSV_INPUT.replace("call", "straddle");
        let err = read_records(malformed.as_bytes()).unwrap_err();
        assert!(matches!(err, OptVolError::Data(_)));
    }

    #[test]
    fn test_missing_file_is_data_error() {
        let err = load_records("/nonexistent/market_data.csv").unwrap_err();
        assert!(matches!(err, OptVolError::Data(_)));
    }

    #[test]
    fn test_write_valuations_round_trip() {
        let records = read_records(CSV_INPUT.as_bytes()).unwrap();
        let results = value_batch(&records, &ValuationConfig::default());

        let mut buffer = Vec::new();
        let written = write_valuations(&mut buffer, &records, &results).unwrap();
        assert_eq!(written, 2);

        let output = String::from_utf8(buffer).unwrap();
        let header = output.lines().next().unwrap();
        assert!(header.contains("BS_Price"));
        assert!(header.contains("BT_Price"));
        assert!(header.contains("implied_volatility"));
        assert!(header.contains("Price_Difference_Percent"));
        assert_eq!(output.lines().count(), 3);
    }

    #[test]
    fn test_failed_records_skipped_on_write() {
        let mut records = read_records(CSV_INPUT.as_bytes()).unwrap();
        records[1].volatility = -1.0;
        let results = value_batch(&records, &ValuationConfig::default());

        let mut buffer = Vec::new();
        let written = write_valuations(&mut buffer, &records, &results).unwrap();
        assert_eq!(written, 1);
    }
}
