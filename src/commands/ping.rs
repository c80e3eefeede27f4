use serenity::builder::CreateMessage;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use std::time::Instant;
use crate::services::ping_service;

pub async fn execute(ctx: &Context, msg: &Message) -> Result<(), String> {
    let client = super::coingecko_client(ctx).await?;
    super::reserve_api_call().await?;

    let start_time = Instant::now();

    let response = msg
        .channel_id
        .send_message(ctx, CreateMessage::default().content("📊 Calculating metrics..."))
        .await
        .map_err(|e| e.to_string())?;

    let bot_started = {
        let data = ctx.data.read().await;
        data.get::<crate::BotData>().copied()
    };

    let metrics = ping_service::get_ping_metrics(&client, start_time, bot_started).await;
    let embed = ping_service::create_ping_embed(&metrics);

    response.delete(ctx).await
        .map_err(|e| e.to_string())?;

    msg.channel_id
        .send_message(ctx, CreateMessage::default().embed(embed))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
