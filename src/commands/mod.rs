pub mod ping;
pub mod help;
pub mod coins;
pub mod coin;
pub mod chart;

use serenity::builder::{CreateEmbed, CreateMessage};
use serenity::model::channel::Message;
use serenity::prelude::Context;
use tracing::{error, warn};
use crate::api::coingecko::{CoinError, CoinGeckoClient};
use crate::utils::{check_api_budget, check_cooldown};

pub async fn handle_message(ctx: &Context, msg: &Message) {
    if msg.author.bot {
        return;
    }

    let parts: Vec<&str> = msg.content.split_whitespace().collect();
    let Some((&command, args)) = parts.split_first() else {
        return;
    };

    if !matches!(command, "$ping" | "$help" | "$coins" | "$list" | "$coin" | "$chart") {
        return;
    }

    if let Err(remaining) = check_cooldown(msg.author.id, command).await {
        let _ = msg.channel_id.send_message(
            ctx,
            CreateMessage::default().embed(
                CreateEmbed::default()
                    .title("Command Cooldown")
                    .description(format!("⏳ Please wait {} seconds before using this command again.", remaining))
                    .color(0xffa500)
            )
        ).await;
        return;
    }

    let result = match command {
        "$ping" => ping::execute(ctx, msg).await,
        "$help" => help::execute(ctx, msg).await,
        "$coins" | "$list" => coins::execute(ctx, msg, args).await,
        "$coin" => coin::execute(ctx, msg, args).await,
        "$chart" => chart::execute(ctx, msg, args).await,
        _ => return,
    };

    if let Err(e) = result {
        error!("❌ Error executing command {}: {}", command, e);

        let user_message = if e.is_empty() {
            "❌ An error occurred while executing the command.".to_string()
        } else {
            e
        };

        let embed = CreateEmbed::default()
            .title("Command Error")
            .description(user_message)
            .color(0xff0000);

        let _ = msg.channel_id
            .send_message(ctx, CreateMessage::default().embed(embed))
            .await;
    }
}

/// Shared CoinGecko client stored in the client's TypeMap
pub async fn coingecko_client(ctx: &Context) -> Result<CoinGeckoClient, String> {
    let data = ctx.data.read().await;
    data.get::<crate::CoinGecko>()
        .cloned()
        .ok_or_else(|| "CoinGecko client not initialized".to_string())
}

/// Spend one call of the CoinGecko budget or tell the user how long to wait
pub async fn reserve_api_call() -> Result<(), String> {
    check_api_budget().await.map_err(|wait_ms| {
        warn!("CoinGecko call budget exhausted, next slot in {} ms", wait_ms);
        format!(
            "⏳ Market data is busy right now. Please try again in {} seconds.",
            wait_ms.div_ceil(1000)
        )
    })
}

/// User-facing text for each fetch failure
pub fn describe_coin_error(err: &CoinError) -> String {
    match err {
        CoinError::InvalidUrl(_) => {
            "❌ The market data endpoint is misconfigured. Please contact the bot owner.".to_string()
        }
        CoinError::InvalidResponse(_) => {
            "⚠️ **Network Error**: CoinGecko did not answer correctly. Please try again later.".to_string()
        }
        CoinError::InvalidData(_) => {
            "⚠️ CoinGecko sent data we could not read. Please try again later.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_coin_error_per_variant() {
        let url = describe_coin_error(&CoinError::InvalidUrl("x".into()));
        let response = describe_coin_error(&CoinError::InvalidResponse("HTTP 500".into()));
        let data = describe_coin_error(&CoinError::InvalidData("eof".into()));

        assert!(url.contains("misconfigured"));
        assert!(response.contains("Network Error"));
        assert!(data.contains("could not read"));
    }
}
