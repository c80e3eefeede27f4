use serenity::builder::{CreateEmbed, CreateEmbedFooter, CreateMessage};
use serenity::model::channel::Message;
use serenity::prelude::Context;
use crate::services::market_service;

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    tracing::info!("🪙 Coins command called with args: {:?}", args);

    let page_number = match args.first() {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| format!("❌ Invalid page '{}'. Usage: `$coins [page]`", raw))?,
        None => 1,
    };

    let client = super::coingecko_client(ctx).await?;
    super::reserve_api_call().await?;

    let coins = market_service::get_market_data(&client)
        .await
        .map_err(|e| {
            tracing::warn!("Market data fetch failed: {}", e);
            super::describe_coin_error(&e)
        })?;

    let page = market_service::paginate(&coins, page_number)?;
    let table = market_service::render_coin_table(&page);

    let embed = CreateEmbed::default()
        .title("📊 Assets")
        .description(table)
        .footer(CreateEmbedFooter::new(format!(
            "Page {}/{} • Prices in USD • `$coin <id>` for details",
            page.page, page.total_pages
        )))
        .color(0x00ff00);

    msg.channel_id
        .send_message(ctx, CreateMessage::default().embed(embed))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
