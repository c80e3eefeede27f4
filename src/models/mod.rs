//! Data models for bot commands and services
//!
//! Result and data transfer structs shared between commands and services.
//! Raw API payloads live next to their client in `api::coingecko::models`.

pub mod chart;
pub mod market;
pub mod ping;

pub use chart::{ChartPoint, ChartResult};
pub use market::CoinPage;
pub use ping::PingMetrics;
