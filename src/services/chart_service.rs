use plotters::prelude::*;
use chrono::{DateTime, Days, Months, NaiveDate, NaiveTime, Utc};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};
use crate::api::coingecko::{CoinError, CoinGeckoClient, PricePoint};
use crate::models::{ChartPoint, ChartResult};

/// Long-form US date, e.g. "August 20, 2023"
pub const DATE_LABEL_FORMAT: &str = "%B %-d, %Y";

/// Trailing window a price history can be narrowed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    OneWeek,
    OneMonth,
    SixMonths,
    OneYear,
    /// Any input that names no window; its cutoff is `now` itself
    Unrecognized,
}

impl TimeWindow {
    /// Parse a user-supplied window: 1w, 1m, 6m, 1y (long forms accepted)
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "1w" | "1week" | "7d" => TimeWindow::OneWeek,
            "1m" | "1month" => TimeWindow::OneMonth,
            "6m" | "6months" => TimeWindow::SixMonths,
            "1y" | "1year" => TimeWindow::OneYear,
            _ => TimeWindow::Unrecognized,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::OneWeek => "1W",
            TimeWindow::OneMonth => "1M",
            TimeWindow::SixMonths => "6M",
            TimeWindow::OneYear => "1Y",
            TimeWindow::Unrecognized => "today",
        }
    }

    /// Earliest calendar date still inside the window ending at `now`
    ///
    /// Month and year steps are calendar steps; a day missing from the target
    /// month clamps to that month's last day.
    pub fn cutoff(&self, now: DateTime<Utc>) -> NaiveDate {
        let today = now.date_naive();
        let cutoff = match self {
            TimeWindow::OneWeek => today.checked_sub_days(Days::new(7)),
            TimeWindow::OneMonth => today.checked_sub_months(Months::new(1)),
            TimeWindow::SixMonths => today.checked_sub_months(Months::new(6)),
            TimeWindow::OneYear => today.checked_sub_months(Months::new(12)),
            TimeWindow::Unrecognized => Some(today),
        };
        cutoff.unwrap_or(NaiveDate::MIN)
    }
}

/// Map raw history into dated, labelled chart points, preserving order
///
/// Timestamps outside chrono's representable range are skipped.
pub fn to_chart_points(prices: &[PricePoint]) -> Vec<ChartPoint> {
    prices
        .iter()
        .filter_map(|point| {
            let timestamp = DateTime::<Utc>::from_timestamp_millis(point.timestamp_ms)?;
            let date = timestamp.date_naive();
            Some(ChartPoint {
                date,
                label: date.format(DATE_LABEL_FORMAT).to_string(),
                price: point.price,
            })
        })
        .collect()
}

/// Keep the points dated on or after the window's cutoff
///
/// Always pass the full series: a narrower window applied to an already
/// filtered series is fine, a wider one cannot bring points back.
pub fn filter_by_window(points: &[ChartPoint], window: TimeWindow, now: DateTime<Utc>) -> Vec<ChartPoint> {
    let cutoff = window.cutoff(now);
    points
        .iter()
        .filter(|point| point.date >= cutoff)
        .cloned()
        .collect()
}

/// Percentage move from the first to the last point
pub fn window_change_percentage(points: &[ChartPoint]) -> Option<f64> {
    let first = points.first()?.price;
    let last = points.last()?.price;
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

/// Fetch a coin's 365-day history and narrow it to `window`
pub async fn get_chart_points(
    client: &CoinGeckoClient,
    coin_id: &str,
    window: TimeWindow,
    now: DateTime<Utc>,
) -> Result<Vec<ChartPoint>, CoinError> {
    let history = client.fetch_price_history(coin_id).await?;
    debug!("Fetched {} price points for {}", history.len(), coin_id);

    let points = to_chart_points(&history);
    let filtered = filter_by_window(&points, window, now);
    info!(
        "{} chart ({}): {} of {} points since {}",
        coin_id,
        window.label(),
        filtered.len(),
        points.len(),
        window.cutoff(now)
    );

    Ok(filtered)
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

static CHART_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Scratch file for one render, unique per process and call
fn chart_temp_path() -> PathBuf {
    let sequence = CHART_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("cmm_chart_{}_{}.png", std::process::id(), sequence))
}

/// Render a line chart of `points` as PNG bytes
///
/// Needs at least two points. CPU-bound; call from `spawn_blocking`.
pub fn generate_chart(
    coin_id: &str,
    window: TimeWindow,
    points: &[ChartPoint],
    width: u32,
    height: u32,
) -> Result<ChartResult, String> {
    if points.len() < 2 {
        return Err(format!(
            "❌ Not enough price data for {} in window {} (minimum 2 points required).",
            coin_id,
            window.label()
        ));
    }

    let temp_file = chart_temp_path();

    {
        let backend = BitMapBackend::new(&temp_file, (width, height));
        let root = backend.into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| format!("Failed to fill canvas: {}", e))?;

        let min_price = points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
        let max_price = points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);

        let price_range = (max_price - min_price).max(1e-8);
        let padding = price_range * 0.1;
        let y_min = (min_price - padding).max(0.0);
        let y_max = max_price + padding;

        let x_min = midnight_utc(points[0].date);
        let mut x_max = midnight_utc(points[points.len() - 1].date);
        if x_max <= x_min {
            x_max = x_min + chrono::Duration::days(1);
        }

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("{} / USD ({})", coin_id, window.label()),
                ("sans-serif", 40.0).into_font(),
            )
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| format!("Failed to build chart: {}", e))?;

        chart
            .configure_mesh()
            .x_label_formatter(&|dt: &DateTime<Utc>| dt.format("%b %-d").to_string())
            .y_desc("Price (USD)")
            .x_desc("Date")
            .draw()
            .map_err(|e| format!("Failed to draw mesh: {}", e))?;

        chart
            .draw_series(LineSeries::new(
                points.iter().map(|p| (midnight_utc(p.date), p.price)),
                &BLUE,
            ))
            .map_err(|e| format!("Failed to draw line: {}", e))?;

        root.present()
            .map_err(|e| format!("Failed to render chart: {}", e))?;
    }

    let png = std::fs::read(&temp_file)
        .map_err(|e| format!("Failed to read chart file: {}", e))?;
    let _ = std::fs::remove_file(&temp_file);

    let first_price = points[0].price;
    let last_price = points[points.len() - 1].price;

    Ok(ChartResult {
        coin_id: coin_id.to_string(),
        window_label: window.label().to_string(),
        points: points.len(),
        first_price,
        last_price,
        change_percentage: window_change_percentage(points).unwrap_or(0.0),
        png,
    })
}
