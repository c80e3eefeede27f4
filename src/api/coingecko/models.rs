use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of `GET /coins/markets`
///
/// Field names match the API's snake_case keys one-to-one. Nullable fields
/// stay `None` when the key is absent or `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinSummary {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub market_cap_rank: u32,
    pub fully_diluted_valuation: Option<f64>,
    pub total_volume: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub price_change_24h: f64,
    pub price_change_percentage_24h: f64,
    pub market_cap_change_24h: f64,
    pub market_cap_change_percentage_24h: f64,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub ath: f64,
    pub ath_change_percentage: f64,
    pub ath_date: DateTime<Utc>,
    pub roi: Option<Roi>,
    pub atl: f64,
    pub atl_change_percentage: f64,
    pub atl_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub price_change_percentage_24h_in_currency: Option<f64>,
}

/// Return on investment since the coin's ICO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roi {
    pub times: f64,
    pub currency: String,
    pub percentage: f64,
}

/// A raw `[timestamp_ms, price]` pair from the market chart endpoint
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "(f64, f64)")]
pub struct PricePoint {
    pub timestamp_ms: i64,
    pub price: f64,
}

impl From<(f64, f64)> for PricePoint {
    fn from((timestamp_ms, price): (f64, f64)) -> Self {
        Self {
            timestamp_ms: timestamp_ms as i64,
            price,
        }
    }
}

/// Body of `GET /coins/{id}/market_chart`
///
/// The endpoint also returns `market_caps` and `total_volumes`; only prices are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChartResponse {
    pub prices: Vec<PricePoint>,
}

/// Body of `GET /ping`
#[derive(Debug, Clone, Deserialize)]
pub struct PingResponse {
    pub gecko_says: String,
}

/// Failure modes of a single CoinGecko fetch
#[derive(Debug, Clone, Error)]
pub enum CoinError {
    /// The endpoint could not be assembled into a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Transport failure or a status other than 200
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// The body did not match the expected schema
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
