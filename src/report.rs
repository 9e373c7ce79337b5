// src/report.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final structured line for the `price` subcommand. Field names are the
/// wire format consumed by downstream tooling.
#[derive(Debug, Serialize, Deserialize)]
pub struct PriceReport {
    pub ticker: String,
    #[serde(rename = "priceInSol")]
    pub price_in_sol: f64,
}

impl PriceReport {
    pub fn new(ticker: String, price_in_sol: f64) -> Self {
        Self { ticker, price_in_sol }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Final structured line summarizing a confirmed swap.
#[derive(Debug, Serialize, Deserialize)]
pub struct SwapReport {
    pub ticker: String,
    pub side: String,
    pub amount_in: f64,
    pub pool_price: f64,
    pub min_amount_out: u64,
    pub transaction_id: String,
    pub timestamp: DateTime<Utc>,
}

impl SwapReport {
    pub fn new(
        ticker: String,
        is_buy: bool,
        amount_in: f64,
        pool_price: f64,
        min_amount_out: u64,
        transaction_id: String,
    ) -> Self {
        Self {
            ticker,
            side: if is_buy { "buy" } else { "sell" }.to_string(),
            amount_in,
            pool_price,
            min_amount_out,
            transaction_id,
            timestamp: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_report_wire_format() {
        let report = PriceReport::new("JELLY".to_string(), 31.25);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"priceInSol\":31.25"));
        assert!(json.contains("\"ticker\":\"JELLY\""));
    }

    #[test]
    fn test_swap_report_roundtrip() {
        let report = SwapReport::new(
            "JELLY".to_string(),
            true,
            0.01,
            1000.0,
            9_950_000,
            "5sig".to_string(),
        );
        let json = serde_json::to_string(&report).unwrap();
        let deserialized: SwapReport = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.side, "buy");
        assert_eq!(deserialized.min_amount_out, 9_950_000);
        assert_eq!(deserialized.transaction_id, "5sig");
    }
}
