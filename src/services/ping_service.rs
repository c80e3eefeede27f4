use serenity::builder::CreateEmbed;
use std::time::{Duration, Instant};
use tracing::warn;
use crate::api::coingecko::CoinGeckoClient;
use crate::models::PingMetrics;

pub fn format_uptime(elapsed: Duration) -> String {
    let hours = elapsed.as_secs() / 3600;
    let minutes = (elapsed.as_secs() % 3600) / 60;
    let seconds = elapsed.as_secs() % 60;
    format!("{}h {}m {}s", hours, minutes, seconds)
}

/// Time the Discord roundtrip so far and ping CoinGecko once
pub async fn get_ping_metrics(
    client: &CoinGeckoClient,
    start_time: Instant,
    bot_started: Option<Instant>,
) -> PingMetrics {
    let response_roundtrip = start_time.elapsed().as_millis() as u64;
    let uptime = bot_started
        .map(|started| format_uptime(started.elapsed()))
        .unwrap_or_else(|| "Unknown".to_string());

    let api_start = Instant::now();
    let (api_latency, api_status) = match client.ping().await {
        Ok(says) => (Some(api_start.elapsed().as_millis() as u64), says),
        Err(e) => {
            warn!("CoinGecko ping failed: {}", e);
            (None, e.to_string())
        }
    };

    PingMetrics {
        response_roundtrip,
        uptime,
        api_latency,
        api_status,
    }
}

pub fn create_ping_embed(metrics: &PingMetrics) -> CreateEmbed {
    let api_latency = metrics
        .api_latency
        .map(|ms| format!("{}ms", ms))
        .unwrap_or_else(|| "unreachable".to_string());

    CreateEmbed::default()
        .title("Pong! 🏓")
        .field("Response Roundtrip", format!("{}ms", metrics.response_roundtrip), true)
        .field("CoinGecko Latency", api_latency, true)
        .field("CoinGecko Says", &metrics.api_status, false)
        .field("Uptime", &metrics.uptime, false)
        .color(if metrics.api_latency.is_some() { 0x00b0f4 } else { 0xffa500 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(3 * 3600 + 25 * 60 + 7)), "3h 25m 7s");
        assert_eq!(format_uptime(Duration::from_secs(59)), "0h 0m 59s");
    }

    #[tokio::test]
    async fn test_ping_metrics_with_unreachable_api() {
        let client = CoinGeckoClient::with_base_url("http://127.0.0.1:1".to_string());
        let metrics = get_ping_metrics(&client, Instant::now(), None).await;

        assert!(metrics.api_latency.is_none());
        assert_eq!(metrics.uptime, "Unknown");
        assert!(metrics.api_status.starts_with("Invalid response"));
    }
}
