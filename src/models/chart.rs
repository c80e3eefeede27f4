//! Chart generation models

use chrono::NaiveDate;

/// A single display-ready point on a price chart
///
/// `date` is the value used for comparisons; `label` is its long-form
/// rendering and is only meant for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub label: String,
    pub price: f64,
}

/// Chart rendered for one coin and one window
#[derive(Debug)]
pub struct ChartResult {
    pub coin_id: String,
    pub window_label: String,
    pub points: usize,
    pub first_price: f64,
    pub last_price: f64,
    pub change_percentage: f64,
    pub png: Vec<u8>,
}
