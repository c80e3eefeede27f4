use serenity::builder::CreateMessage;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use crate::services::market_service;

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    let query = args.first().copied().unwrap_or("");
    tracing::info!("🪙 Coin command called for '{}'", query);

    let client = super::coingecko_client(ctx).await?;
    super::reserve_api_call().await?;

    let coins = market_service::get_market_data(&client)
        .await
        .map_err(|e| {
            tracing::warn!("Market data fetch failed: {}", e);
            super::describe_coin_error(&e)
        })?;

    let coin = market_service::find_coin(&coins, query).ok_or_else(|| {
        format!("❌ '{}' is not in the top {} coins by market cap.", query, coins.len())
    })?;

    let embed = market_service::create_coin_embed(coin);

    msg.channel_id
        .send_message(ctx, CreateMessage::default().embed(embed))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
