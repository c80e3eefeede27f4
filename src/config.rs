use tracing::warn;
use crate::api::coingecko::CoinGeckoClient;

const DEFAULT_CHART_WIDTH: u32 = 1024;
const DEFAULT_CHART_HEIGHT: u32 = 768;

/// Runtime settings read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub coingecko_api_url: String,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup so tests need not touch process env
    fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or("DISCORD_TOKEN not set")?;

        let coingecko_api_url = lookup("COINGECKO_API_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| CoinGeckoClient::DEFAULT_BASE_URL.to_string());

        Ok(Config {
            discord_token,
            coingecko_api_url,
            chart_width: parse_dimension(&lookup, "CHART_WIDTH", DEFAULT_CHART_WIDTH),
            chart_height: parse_dimension(&lookup, "CHART_HEIGHT", DEFAULT_CHART_HEIGHT),
        })
    }
}

fn parse_dimension<F>(lookup: &F, key: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(value) if value > 0 => value,
            _ => {
                warn!("Ignoring {}={:?}, using {}", key, raw, default);
                default
            }
        },
    }
}
