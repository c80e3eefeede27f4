use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::time::Instant;
use tracing::{info, warn, error, debug};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod utils;

use api::coingecko::CoinGeckoClient;
use config::Config;

struct Handler;

struct BotData;

impl TypeMapKey for BotData {
    type Value = Instant;
}

struct CoinGecko;

impl TypeMapKey for CoinGecko {
    type Value = CoinGeckoClient;
}

struct Settings;

impl TypeMapKey for Settings {
    type Value = Config;
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        commands::handle_message(&ctx, &msg).await;
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        debug!("Checking Discord rate limit status...");
        match ctx.http.get_current_user().await {
            Ok(_) => {
                info!("No rate limit detected - Bot is fully ready!");
            }
            Err(e) => {
                let error_msg = e.to_string();
                if error_msg.contains("429") || error_msg.contains("rate limit") || error_msg.contains("Ratelimited") {
                    warn!("Bot is being rate limited by Discord! Error: {}", error_msg);
                } else {
                    warn!("Failed to check rate limit status: {}", error_msg);
                }
            }
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let mut env_filter = EnvFilter::from_default_env();
    for directive in ["crypto_mock_millionaire=debug", "serenity=warn"] {
        match directive.parse::<Directive>() {
            Ok(d) => env_filter = env_filter.add_directive(d),
            Err(e) => eprintln!("Invalid log directive {}: {}", directive, e),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("🤖 Starting Crypto Mock Millionaire bot...");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    info!("Using CoinGecko API at {}", config.coingecko_api_url);
    let coingecko = CoinGeckoClient::with_base_url(config.coingecko_api_url.clone());

    let intents = GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MESSAGES;

    let mut client = match Client::builder(&config.discord_token, intents)
        .event_handler(Handler)
        .await
    {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create client: {}", e);
            return;
        }
    };

    {
        let mut data = client.data.write().await;
        data.insert::<BotData>(Instant::now());
        data.insert::<CoinGecko>(coingecko);
        data.insert::<Settings>(config);
    }

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }
}
