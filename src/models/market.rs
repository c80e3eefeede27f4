//! Market listing models

use crate::api::coingecko::CoinSummary;

/// One page of the ranked market list
#[derive(Debug, Clone)]
pub struct CoinPage {
    pub page: usize,
    pub total_pages: usize,
    pub coins: Vec<CoinSummary>,
}
