use chrono::Utc;
use serenity::all::CreateAttachment;
use serenity::builder::{CreateEmbed, CreateEmbedFooter, CreateMessage};
use serenity::model::channel::Message;
use serenity::prelude::Context;
use crate::services::chart_service::{self, TimeWindow};
use crate::services::market_service::format_price;
use crate::utils::Table;

const DEFAULT_WINDOW: &str = "1y";

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    tracing::info!("🎨 Chart command received from user {} with args: {:?}", msg.author.id, args);

    let Some(&coin_id) = args.first() else {
        return Err("❌ Usage: `$chart <coin id> [window]`\nWindows: 1w, 1m, 6m, 1y".to_string());
    };
    let coin_id = coin_id.to_lowercase();

    let window_arg = args.get(1).copied().unwrap_or(DEFAULT_WINDOW);
    let window = TimeWindow::parse(window_arg);
    if window == TimeWindow::Unrecognized {
        tracing::warn!("Unrecognized chart window '{}', only today's points will be kept", window_arg);
    }

    let (client, width, height) = {
        let client = super::coingecko_client(ctx).await?;
        let data = ctx.data.read().await;
        let config = data
            .get::<crate::Settings>()
            .ok_or("Configuration not initialized".to_string())?;
        (client, config.chart_width, config.chart_height)
    };

    if let Err(e) = msg.channel_id.broadcast_typing(ctx.http.as_ref()).await {
        tracing::warn!("Failed to broadcast typing: {}", e);
    }

    super::reserve_api_call().await?;
    let points = chart_service::get_chart_points(&client, &coin_id, window, Utc::now())
        .await
        .map_err(|e| {
            tracing::warn!("Price history fetch for {} failed: {}", coin_id, e);
            super::describe_coin_error(&e)
        })?;

    let render_id = coin_id.clone();
    let chart = tokio::task::spawn_blocking(move || {
        chart_service::generate_chart(&render_id, window, &points, width, height)
    })
    .await
    .map_err(|e| format!("Chart rendering task failed: {}", e))??;

    tracing::info!("✓ Chart generated for {}: {} points, {} bytes", chart.coin_id, chart.points, chart.png.len());

    let mut summary = Table::new(vec!["Window", "Start", "End", "Change"]);
    let start = format_price(chart.first_price);
    let end = format_price(chart.last_price);
    let change = format!("{:+.2}%", chart.change_percentage);
    summary.add_row(vec![chart.window_label.as_str(), start.as_str(), end.as_str(), change.as_str()]);

    let filename = format!("chart_{}_{}.png", chart.coin_id, chart.window_label);
    let embed = CreateEmbed::default()
        .title(format!("📈 {} price", chart.coin_id))
        .description(summary.render())
        .image(format!("attachment://{}", filename))
        .footer(CreateEmbedFooter::new(format!("{} daily points • USD", chart.points)))
        .color(if chart.change_percentage < 0.0 { 0xff0000 } else { 0x00ff00 });

    let message = CreateMessage::default()
        .embed(embed)
        .add_file(CreateAttachment::bytes(chart.png, filename));

    msg.channel_id
        .send_message(ctx, message)
        .await
        .map_err(|e| format!("Failed to send chart: {}", e))?;

    Ok(())
}
