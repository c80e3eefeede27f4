//! Ping/status command models

/// Bot latency, uptime and upstream API health
#[derive(Debug)]
pub struct PingMetrics {
    pub response_roundtrip: u64,
    pub uptime: String,
    pub api_latency: Option<u64>,
    pub api_status: String,
}
