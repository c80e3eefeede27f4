use reqwest::{Client as HttpClient, StatusCode, Url};
use serde::de::DeserializeOwned;
use super::models::{CoinError, CoinSummary, MarketChartResponse, PingResponse, PricePoint};
use tracing::{debug, warn};

/// CoinGecko public API client for market listings and price history
///
/// Every call is a single GET with no retry and no caching; callers get a
/// fresh snapshot each time.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http_client: HttpClient,
    base_url: String,
}

impl CoinGeckoClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.coingecko.com/api/v3";
    const VS_CURRENCY: &'static str = "usd";
    const MARKETS_PER_PAGE: &'static str = "50";
    const HISTORY_DAYS: &'static str = "365";

    /// Create a client against the public API
    pub fn new() -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL (configuration and testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
        }
    }

    /// Append `segments` to the base URL path and attach the query parameters
    ///
    /// Each segment is percent-encoded on its own, so `/`, `?` and `#` inside
    /// a segment cannot change the endpoint. No `?` is added when `params` is empty.
    fn endpoint(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Url, CoinError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CoinError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| CoinError::InvalidUrl(format!("{}: cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url)
    }

    /// Issue one GET and decode the body as `T`
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CoinError> {
        debug!("GET {}", url);

        let response = self.http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CoinError::InvalidResponse(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body_text = response.text().await.unwrap_or_default();
            warn!("CoinGecko returned {} for {}: {}", status, url.path(), body_text);
            return Err(CoinError::InvalidResponse(format!("HTTP {}", status.as_u16())));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CoinError::InvalidResponse(format!("Failed to read body: {}", e)))?;

        serde_json::from_slice::<T>(&body)
            .map_err(|e| CoinError::InvalidData(format!("Failed to parse response: {}", e)))
    }

    /// GET /coins/markets
    ///
    /// Top 50 coins by market cap, priced in USD, first page, no sparkline.
    pub async fn fetch_market_data(&self) -> Result<Vec<CoinSummary>, CoinError> {
        let url = self.endpoint(
            &["coins", "markets"],
            &[
                ("vs_currency", Self::VS_CURRENCY),
                ("order", "market_cap_desc"),
                ("per_page", Self::MARKETS_PER_PAGE),
                ("page", "1"),
                ("sparkline", "false"),
            ],
        )?;

        self.get_json::<Vec<CoinSummary>>(url).await
    }

    /// GET /coins/{id}/market_chart
    ///
    /// Daily USD prices for the trailing 365 days, oldest first.
    ///
    /// # Arguments
    /// * `coin_id` - CoinGecko coin identifier, e.g. `bitcoin`
    pub async fn fetch_price_history(&self, coin_id: &str) -> Result<Vec<PricePoint>, CoinError> {
        let coin_id = coin_id.trim();
        if coin_id.is_empty() {
            return Err(CoinError::InvalidUrl("coin id is empty".to_string()));
        }
        if coin_id == "." || coin_id == ".." {
            return Err(CoinError::InvalidUrl(format!("coin id '{}' is not a path segment", coin_id)));
        }

        let url = self.endpoint(
            &["coins", coin_id, "market_chart"],
            &[("vs_currency", Self::VS_CURRENCY), ("days", Self::HISTORY_DAYS)],
        )?;

        let chart = self.get_json::<MarketChartResponse>(url).await?;
        Ok(chart.prices)
    }

    /// GET /ping
    pub async fn ping(&self) -> Result<String, CoinError> {
        let url = self.endpoint(&["ping"], &[])?;
        let pong = self.get_json::<PingResponse>(url).await?;
        Ok(pong.gecko_says)
    }
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn coin_json(id: &str, rank: u32) -> serde_json::Value {
        json!({
            "id": id,
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            "current_price": 26045.12,
            "market_cap": 507023411246.0,
            "market_cap_rank": rank,
            "fully_diluted_valuation": null,
            "total_volume": 9231480123.0,
            "high_24h": 26210.0,
            "low_24h": 25890.5,
            "price_change_24h": -110.3,
            "price_change_percentage_24h": -0.42171,
            "market_cap_change_24h": -2061234567.0,
            "market_cap_change_percentage_24h": -0.40491,
            "circulating_supply": 19466225.0,
            "total_supply": 21000000.0,
            "max_supply": 21000000.0,
            "ath": 69045.0,
            "ath_change_percentage": -62.2876,
            "ath_date": "2021-11-10T14:24:11.849Z",
            "roi": null,
            "atl": 67.81,
            "atl_change_percentage": 38298.5,
            "atl_date": "2013-07-06T00:00:00.000Z",
            "last_updated": "2023-08-20T17:45:13.152Z",
            "price_change_percentage_24h_in_currency": -0.42171
        })
    }

    #[tokio::test]
    async fn test_fetch_market_data() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/markets")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("vs_currency".into(), "usd".into()),
                Matcher::UrlEncoded("order".into(), "market_cap_desc".into()),
                Matcher::UrlEncoded("per_page".into(), "50".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("sparkline".into(), "false".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!([coin_json("bitcoin", 1), coin_json("ethereum", 2)]).to_string())
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(server.url());
        let coins = client.fetch_market_data().await.unwrap();

        assert_eq!(coins.len(), 2);
        assert_eq!(coins[0].id, "bitcoin");
        assert_eq!(coins[1].market_cap_rank, 2);
        assert!(coins[0].fully_diluted_valuation.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_market_data_non_200() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/markets")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"status":{"error_code":429,"error_message":"rate limited"}}"#)
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(server.url());
        let result = client.fetch_market_data().await;

        assert!(matches!(result, Err(CoinError::InvalidResponse(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_market_data_missing_fields() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/markets")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!([{ "id": "bitcoin", "symbol": "btc" }]).to_string())
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(server.url());
        let result = client.fetch_market_data().await;

        assert!(matches!(result, Err(CoinError::InvalidData(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_base_url() {
        let client = CoinGeckoClient::with_base_url("not a url".to_string());

        assert!(matches!(client.fetch_market_data().await, Err(CoinError::InvalidUrl(_))));
        assert!(matches!(
            client.fetch_price_history("bitcoin").await,
            Err(CoinError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_invalid_response() {
        let client = CoinGeckoClient::with_base_url("http://127.0.0.1:1".to_string());
        let result = client.fetch_market_data().await;

        assert!(matches!(result, Err(CoinError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_fetch_price_history_uses_coin_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/ethereum/market_chart")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("vs_currency".into(), "usd".into()),
                Matcher::UrlEncoded("days".into(), "365".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "prices": [[1692489600000u64, 1680.2], [1692576000000u64, 1672.9]],
                    "market_caps": [],
                    "total_volumes": []
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(server.url());
        let prices = client.fetch_price_history("ethereum").await.unwrap();

        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].timestamp_ms, 1692489600000);
        assert_eq!(prices[1].price, 1672.9);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_price_history_bad_payload() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/bitcoin/market_chart")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"prices": [[1692489600000, "26045.12", 7]]}"#)
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(server.url());
        let result = client.fetch_price_history("bitcoin").await;

        assert!(matches!(result, Err(CoinError::InvalidData(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_price_history_not_found() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/not-a-coin/market_chart")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error":"coin not found"}"#)
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(server.url());
        let result = client.fetch_price_history("not-a-coin").await;

        assert!(matches!(result, Err(CoinError::InvalidResponse(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ping() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .with_status(200)
            .with_body(r#"{"gecko_says":"(V3) To the Moon!"}"#)
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(format!("{}/", server.url()));
        assert_eq!(client.ping().await.unwrap(), "(V3) To the Moon!");
        mock.assert_async().await;
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = CoinGeckoClient::new();

        let ping = client.endpoint(&["ping"], &[]).unwrap();
        assert_eq!(ping.as_str(), "https://api.coingecko.com/api/v3/ping");
        assert!(ping.query().is_none());

        let history = client
            .endpoint(&["coins", "../../ping#", "market_chart"], &[("days", "365")])
            .unwrap();
        assert_eq!(history.path(), "/api/v3/coins/..%2F..%2Fping%23/market_chart");
        assert_eq!(history.query(), Some("days=365"));
        assert!(history.fragment().is_none());
    }

    #[tokio::test]
    async fn test_coin_id_cannot_change_endpoint() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/bit%3Fcoin/market_chart")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("vs_currency".into(), "usd".into()),
                Matcher::UrlEncoded("days".into(), "365".into()),
            ]))
            .with_status(404)
            .with_body(r#"{"error":"coin not found"}"#)
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(server.url());
        let result = client.fetch_price_history("bit?coin").await;

        assert!(matches!(result, Err(CoinError::InvalidResponse(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_dot_segment_coin_id() {
        let client = CoinGeckoClient::new();
        assert!(matches!(client.fetch_price_history("..").await, Err(CoinError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_empty_coin_id() {
        let client = CoinGeckoClient::new();
        assert!(matches!(client.fetch_price_history("  ").await, Err(CoinError::InvalidUrl(_))));
    }
}
