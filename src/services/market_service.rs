use serenity::builder::{CreateEmbed, CreateEmbedFooter};
use tracing::{debug, info};
use crate::api::coingecko::{CoinError, CoinGeckoClient, CoinSummary};
use crate::models::CoinPage;
use crate::utils::{Align, Table};

pub const COINS_PER_PAGE: usize = 10;

/// Coin shown when a detail lookup names nothing
pub const DEFAULT_COIN_ID: &str = "bitcoin";

/// Fetch the top coins by market cap
pub async fn get_market_data(client: &CoinGeckoClient) -> Result<Vec<CoinSummary>, CoinError> {
    let coins = client.fetch_market_data().await?;
    info!("Fetched market data for {} coins", coins.len());
    Ok(coins)
}

/// Slice the ranked list into 1-based pages of `COINS_PER_PAGE`
pub fn paginate(coins: &[CoinSummary], page: usize) -> Result<CoinPage, String> {
    let total_pages = coins.len().div_ceil(COINS_PER_PAGE).max(1);
    if page == 0 || page > total_pages {
        return Err(format!("❌ Page {} does not exist. Pages: 1-{}", page, total_pages));
    }

    let start = (page - 1) * COINS_PER_PAGE;
    let end = (start + COINS_PER_PAGE).min(coins.len());
    debug!("Coin page {}/{} -> rows {}..{}", page, total_pages, start, end);

    Ok(CoinPage {
        page,
        total_pages,
        coins: coins[start..end].to_vec(),
    })
}

/// Look a coin up by id, then by symbol (case-insensitive)
///
/// An empty query resolves to `DEFAULT_COIN_ID`.
pub fn find_coin<'a>(coins: &'a [CoinSummary], query: &str) -> Option<&'a CoinSummary> {
    let query = query.trim();
    let query = if query.is_empty() { DEFAULT_COIN_ID } else { query };

    coins
        .iter()
        .find(|c| c.id.eq_ignore_ascii_case(query))
        .or_else(|| coins.iter().find(|c| c.symbol.eq_ignore_ascii_case(query)))
}

/// `$` price with more precision for sub-dollar coins
pub fn format_price(price: f64) -> String {
    if price.abs() >= 1.0 {
        format!("${:.2}", price)
    } else {
        format!("${:.6}", price)
    }
}

/// Signed 24h change; a flat coin shows nothing
pub fn format_change(percentage: f64) -> Option<String> {
    if percentage > 0.0 {
        Some(format!("+{:.2}%", percentage))
    } else if percentage < 0.0 {
        Some(format!("{:.2}%", percentage))
    } else {
        None
    }
}

/// Render a page of coins as a code-block table
pub fn render_coin_table(page: &CoinPage) -> String {
    let mut table = Table::with_alignment(
        vec!["#", "Name", "Symbol", "Price", "24h"],
        vec![Align::Right, Align::Left, Align::Left, Align::Right, Align::Right],
    );
    for coin in &page.coins {
        let rank = coin.market_cap_rank.to_string();
        let symbol = coin.symbol.to_uppercase();
        let price = format_price(coin.current_price);
        let change = format_change(coin.price_change_percentage_24h).unwrap_or_default();
        table.add_row(vec![rank.as_str(), coin.name.as_str(), symbol.as_str(), price.as_str(), change.as_str()]);
    }
    table.render()
}

/// Whole-unit supply; a missing value prints `missing`
fn format_supply(value: Option<f64>, missing: &str) -> String {
    value
        .map(|v| format!("{:.0}", v))
        .unwrap_or_else(|| missing.to_string())
}

/// Circulating and total supply are unknown when absent; only an absent max supply means uncapped
pub fn format_supplies(coin: &CoinSummary) -> String {
    format!(
        "{} / {} / {}",
        format_supply(coin.circulating_supply, "n/a"),
        format_supply(coin.total_supply, "n/a"),
        format_supply(coin.max_supply, "∞")
    )
}

pub fn create_coin_embed(coin: &CoinSummary) -> CreateEmbed {
    let change = format_change(coin.price_change_percentage_24h)
        .unwrap_or_else(|| "0.00%".to_string());
    let color = if coin.price_change_percentage_24h < 0.0 { 0xff0000 } else { 0x00ff00 };

    let mut embed = CreateEmbed::default()
        .title(format!("🪙 {} ({})", coin.name, coin.symbol.to_uppercase()))
        .thumbnail(&coin.image)
        .field("Price", format_price(coin.current_price), true)
        .field("Rank", format!("#{}", coin.market_cap_rank), true)
        .field("24h Change", change, true)
        .field("24h High / Low", format!("{} / {}", format_price(coin.high_24h), format_price(coin.low_24h)), false)
        .field("Market Cap", format!("${:.0}", coin.market_cap), true)
        .field("Volume (24h)", format!("${:.0}", coin.total_volume), true)
        .field(
            "All-Time High",
            format!("{} ({:.2}%) on {}", format_price(coin.ath), coin.ath_change_percentage, coin.ath_date.format("%Y-%m-%d")),
            false,
        )
        .field(
            "All-Time Low",
            format!("{} ({:.2}%) on {}", format_price(coin.atl), coin.atl_change_percentage, coin.atl_date.format("%Y-%m-%d")),
            false,
        )
        .field(
            "Supply (circulating / total / max)",
            format_supplies(coin),
            false,
        );

    if let Some(fdv) = coin.fully_diluted_valuation {
        embed = embed.field("Fully Diluted Valuation", format!("${:.0}", fdv), true);
    }

    if let Some(roi) = &coin.roi {
        embed = embed.field(
            "ROI",
            format!("{:.2}x ({:.2}% in {})", roi.times, roi.percentage, roi.currency.to_uppercase()),
            true,
        );
    }

    embed
        .footer(CreateEmbedFooter::new(format!(
            "Last updated {}",
            coin.last_updated.format("%Y-%m-%d %H:%M UTC")
        )))
        .color(color)
}
