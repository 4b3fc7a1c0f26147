//! Market data retrieval
//!
//! Fetches daily price bars from the Alpha Vantage HTTP API. A thin I/O
//! wrapper: the pricing code consumes the returned [`PriceBar`] rows and
//! knows nothing about the wire format.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

use crate::core::{OptVolError, OptVolResult};

/// One daily OHLCV bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Alpha Vantage API client
pub struct AlphaVantageClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: "https://www.alphavantage.co".to_string(),
            api_key: api_key.into(),
        }
    }

    /// Fetch the full daily bar history for a symbol, oldest first
    pub fn daily_bars(&self, symbol: &str) -> OptVolResult<Vec<PriceBar>> {
        let url = format!("{}/query", self.base_url);
        let response: DailySeriesResponse = self
            .client
            .get(&url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
                ("outputsize", "full"),
            ])
            .send()
            .map_err(|e| OptVolError::network(e.to_string()))?
            .json()
            .map_err(|e| OptVolError::data(format!("failed to parse daily series: {e}")))?;

        let bars = parse_series(response)?;
        info!(symbol, count = bars.len(), "fetched daily bars");
        Ok(bars)
    }
}

#[derive(Debug, Deserialize)]
struct DailySeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, RawBar>>,
    /// Set instead of the series for bad symbols or API keys
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    /// Set instead of the series when rate-limited
    #[serde(rename = "Note")]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

fn parse_series(response: DailySeriesResponse) -> OptVolResult<Vec<PriceBar>> {
    if let Some(message) = response.error_message {
        return Err(OptVolError::data(message));
    }
    if let Some(note) = response.note {
        return Err(OptVolError::data(note));
    }
    let series = response
        .time_series
        .ok_or_else(|| OptVolError::data("no daily time series in API response"))?;

    let mut bars = series
        .into_iter()
        .map(|(date, raw)| parse_bar(&date, &raw))
        .collect::<OptVolResult<Vec<_>>>()?;
    bars.sort_by_key(|bar| bar.date);
    Ok(bars)
}

fn parse_bar(date: &str, raw: &RawBar) -> OptVolResult<PriceBar> {
    let date = date
        .parse::<NaiveDate>()
        .map_err(|e| OptVolError::data(format!("bad bar date '{date}': {e}")))?;
    let field = |name: &str, value: &str| {
        value
            .parse::<f64>()
            .map_err(|_| OptVolError::data(format!("bad {name} value '{value}' for {date}")))
    };

    Ok(PriceBar {
        date,
        open: field("open", &raw.open)?,
        high: field("high", &raw.high)?,
        low: field("low", &raw.low)?,
        close: field("close", &raw.close)?,
        volume: field("volume", &raw.volume)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "Meta Data": {"2. Symbol": "AAPL"},
        "Time Series (Daily)": {
            "2024-03-04": {
                "1. open": "103.0", "2. high": "105.2", "3. low": "102.5",
                "4. close": "104.8", "5. volume": "52000000"
            },
            "2024-03-01": {
                "1. open": "101.4", "2. high": "104.0", "3. low": "101.0",
                "4. close": "103.2", "5. volume": "48000000"
            }
        }
    }"#;

    #[test]
    fn test_parse_series_sorted_by_date() {
        let response: DailySeriesResponse = serde_json::from_str(FIXTURE).unwrap();
        let bars = parse_series(response).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(bars[0].close, 103.2);
        assert_eq!(bars[1].volume, 52_000_000.0);
    }

    #[test]
    fn test_api_error_message_surfaced() {
        let payload = r#"{"Error Message": "Invalid API call."}"#;
        let response: DailySeriesResponse = serde_json::from_str(payload).unwrap();
        let err = parse_series(response).unwrap_err();
        assert!(matches!(err, OptVolError::Data(_)));
    }

    #[test]
    fn test_rate_limit_note_surfaced() {
        let payload = r#"{"Note": "API call frequency exceeded."}"#;
        let response: DailySeriesResponse = serde_json::from_str(payload).unwrap();
        assert!(parse_series(response).is_err());
    }

    #[test]
    fn test_bad_numeric_field_is_data_error() {
        let payload = r#"{
            "Time Series (Daily)": {
                "2024-03-04": {
                    "1. open": "x", "2. high": "1", "3. low": "1",
                    "4. close": "1", "5. volume": "1"
                }
            }
        }"#;
        let response: DailySeriesResponse = serde_json::from_str(payload).unwrap();
        let err = parse_series(response).unwrap_err();
        assert!(matches!(err, OptVolError::Data(_)));
    }
}
