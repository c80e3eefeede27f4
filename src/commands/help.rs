use serenity::builder::{CreateEmbed, CreateMessage};
use serenity::model::channel::Message;
use serenity::prelude::Context;

pub async fn execute(ctx: &Context, msg: &Message) -> Result<(), String> {
    let embed = CreateEmbed::default()
        .title("📖 Crypto Mock Millionaire Help")
        .description("Live cryptocurrency prices and one-year price charts, powered by CoinGecko.")
        .color(0x00b0f4)
        .field(
            "🎯 General",
            "`$ping` - Check bot and CoinGecko latency\n`$help` - Show this help message",
            false,
        )
        .field(
            "🪙 Market",
            "`$coins [page]` - Top 50 coins by market cap, 10 per page\n`$coin <id|symbol>` - Details for one coin (default: bitcoin)",
            false,
        )
        .field(
            "📈 Charts",
            "`$chart <id> [window]` - USD price chart\nWindows: `1w`, `1m`, `6m`, `1y` (default `1y`)",
            false,
        )
        .field(
            "⚡ Rate Limiting",
            "5-second cooldown per command per user\nShared budget of 30 CoinGecko calls per minute",
            false,
        );

    msg.channel_id
        .send_message(ctx, CreateMessage::default().embed(embed))
        .await
        .map_err(|e| format!("Failed to send help message: {}", e))?;

    Ok(())
}
