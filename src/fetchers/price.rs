//! CoinGecko price fetcher

use std::collections::HashMap;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http::ensure_success;
use super::tickers::coingecko_id;
use super::FetchError;
use crate::config::PriceConfig;

type UsdMap = HashMap<String, Option<f64>>;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CoinResponse {
    name: Option<String>,
    symbol: Option<String>,
    market_data: Option<MarketData>,
    last_updated: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MarketData {
    current_price: Option<UsdMap>,
    price_change_percentage_24h: Option<f64>,
    price_change_percentage_7d: Option<f64>,
    price_change_percentage_30d: Option<f64>,
    market_cap: Option<UsdMap>,
    market_cap_rank: Option<u64>,
    total_volume: Option<UsdMap>,
    high_24h: Option<UsdMap>,
    low_24h: Option<UsdMap>,
    ath: Option<UsdMap>,
    ath_date: Option<HashMap<String, Option<String>>>,
    circulating_supply: Option<f64>,
    total_supply: Option<f64>,
}

fn usd(map: &Option<UsdMap>) -> Option<f64> {
    map.as_ref()?.get("usd").copied().flatten()
}

/// Market snapshot for one coin, all figures in USD
///
/// Missing upstream data stays `None` and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub ticker: String,
    pub name: String,
    pub symbol: String,
    pub current_price: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub price_change_7d: Option<f64>,
    pub price_change_30d: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u64>,
    pub volume_24h: Option<f64>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub ath: Option<f64>,
    pub ath_date: Option<String>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub last_updated: Option<String>,
}

impl PriceQuote {
    fn from_response(ticker: &str, data: CoinResponse) -> Self {
        let market = data.market_data.unwrap_or_default();
        Self {
            ticker: ticker.to_uppercase(),
            name: data.name.unwrap_or_else(|| "Unknown".to_string()),
            symbol: data.symbol.unwrap_or_else(|| ticker.to_string()).to_uppercase(),
            current_price: usd(&market.current_price),
            price_change_24h: market.price_change_percentage_24h,
            price_change_7d: market.price_change_percentage_7d,
            price_change_30d: market.price_change_percentage_30d,
            market_cap: usd(&market.market_cap),
            market_cap_rank: market.market_cap_rank,
            volume_24h: usd(&market.total_volume),
            high_24h: usd(&market.high_24h),
            low_24h: usd(&market.low_24h),
            ath: usd(&market.ath),
            ath_date: market
                .ath_date
                .as_ref()
                .and_then(|m| m.get("usd").cloned().flatten()),
            circulating_supply: market.circulating_supply,
            total_supply: market.total_supply,
            last_updated: data.last_updated,
        }
    }
}

/// Outcome of a price lookup: `{success: true, ...quote}` or `{success: false, error}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceReport {
    pub success: bool,
    #[serde(flatten)]
    pub quote: Option<PriceQuote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PriceReport {
    pub fn found(quote: PriceQuote) -> Self {
        Self {
            success: true,
            quote: Some(quote),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            quote: None,
            error: Some(error.into()),
        }
    }
}

/// Fetches market data for a single coin from CoinGecko
#[derive(Debug, Clone)]
pub struct PriceFetcher {
    client: Client,
    api_url: String,
}

impl PriceFetcher {
    pub fn new(client: Client, config: &PriceConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Look up the current market data for `ticker`
    pub async fn fetch(&self, ticker: &str) -> PriceReport {
        match self.fetch_quote(ticker).await {
            Ok(quote) => PriceReport::found(quote),
            Err(err) => {
                log::warn!("Price lookup for {} failed: {}", ticker, err);
                PriceReport::failed(Self::describe(ticker, &err))
            }
        }
    }

    async fn fetch_quote(&self, ticker: &str) -> Result<PriceQuote, FetchError> {
        let coin_id = coingecko_id(ticker);
        let url = format!("{}/coins/{}", self.api_url, coin_id);
        log::debug!("Fetching price for {} from {}", ticker, url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("localization", "false"),
                ("tickers", "false"),
                ("community_data", "false"),
                ("developer_data", "false"),
                ("sparkline", "false"),
            ])
            .send()
            .await?;

        let body = ensure_success(response).await?.text().await?;
        let data: CoinResponse = serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        Ok(PriceQuote::from_response(ticker, data))
    }

    fn describe(ticker: &str, err: &FetchError) -> String {
        match err {
            FetchError::NotFound => {
                format!("Cryptocurrency '{}' not found. Please check the ticker symbol.", ticker)
            }
            FetchError::Status { status, body } => format!("API error: {} - {}", status, body),
            FetchError::Network(e) => {
                format!("Network error: Unable to connect to CoinGecko API. {}", e)
            }
            FetchError::Parse(msg) => format!("Unexpected error: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::fetchers::http::build_client;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher_for(server: &MockServer) -> PriceFetcher {
        let config = PriceConfig {
            api_url: format!("{}/api/v3", server.uri()),
        };
        PriceFetcher::new(build_client(&HttpConfig::default()).unwrap(), &config)
    }

    fn bitcoin_body() -> serde_json::Value {
        json!({
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "last_updated": "2024-05-01T12:00:00.000Z",
            "market_data": {
                "current_price": { "usd": 67234.56, "eur": 62000.0 },
                "price_change_percentage_24h": 2.15,
                "price_change_percentage_7d": -1.3,
                "price_change_percentage_30d": null,
                "market_cap": { "usd": 1320000000000.0 },
                "market_cap_rank": 1,
                "total_volume": { "usd": 28500000000.0 },
                "high_24h": { "usd": 68000.0 },
                "low_24h": { "usd": 65000.5 },
                "ath": { "usd": 73750.07 },
                "ath_date": { "usd": "2024-03-14T07:10:36.635Z" },
                "circulating_supply": 19690000.0,
                "total_supply": 21000000.0
            }
        })
    }

    #[tokio::test]
    async fn test_fetch_success_keeps_exact_price() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/coins/bitcoin"))
            .and(query_param("localization", "false"))
            .and(query_param("sparkline", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bitcoin_body()))
            .mount(&server)
            .await;

        let report = fetcher_for(&server).fetch("btc").await;

        assert!(report.success);
        assert!(report.error.is_none());
        let quote = report.quote.unwrap();
        assert_eq!(quote.ticker, "BTC");
        assert_eq!(quote.name, "Bitcoin");
        assert_eq!(quote.symbol, "BTC");
        assert_eq!(quote.current_price, Some(67234.56));
        assert_eq!(quote.price_change_24h, Some(2.15));
        assert_eq!(quote.price_change_30d, None);
        assert_eq!(quote.market_cap_rank, Some(1));
        assert_eq!(quote.ath_date.as_deref(), Some("2024-03-14T07:10:36.635Z"));
        assert_eq!(quote.total_supply, Some(21000000.0));
    }

    #[tokio::test]
    async fn test_fetch_missing_fields_stay_null() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/coins/zzz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "market_data": null })))
            .mount(&server)
            .await;

        let report = fetcher_for(&server).fetch("ZZZ").await;
        let quote = report.quote.clone().unwrap();
        assert_eq!(quote.name, "Unknown");
        assert_eq!(quote.symbol, "ZZZ");
        assert!(quote.current_price.is_none());
        assert!(quote.market_cap.is_none());

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["success"], true);
        assert!(value["current_price"].is_null());
        assert!(value.as_object().unwrap().contains_key("current_price"));
        assert!(value.get("error").is_none());
    }

    #[tokio::test]
    async fn test_fetch_not_found_mentions_ticker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let report = fetcher_for(&server).fetch("NOPE").await;

        assert!(!report.success);
        assert!(report.quote.is_none());
        let error = report.error.unwrap();
        assert!(error.contains("NOPE"));
        assert!(error.contains("not found"));
    }

    #[tokio::test]
    async fn test_fetch_other_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
            .mount(&server)
            .await;

        let report = fetcher_for(&server).fetch("BTC").await;
        assert_eq!(report.error.as_deref(), Some("API error: 429 - Too Many Requests"));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_unexpected_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let report = fetcher_for(&server).fetch("BTC").await;
        assert!(report.error.unwrap().starts_with("Unexpected error:"));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_is_network_error() {
        let config = PriceConfig {
            api_url: "http://127.0.0.1:1/api/v3".to_string(),
        };
        let fetcher = PriceFetcher::new(build_client(&HttpConfig::default()).unwrap(), &config);

        let report = fetcher.fetch("BTC").await;
        assert!(!report.success);
        assert!(report.error.unwrap().starts_with("Network error:"));
    }

    #[test]
    fn test_failed_report_serialization() {
        let value = serde_json::to_value(PriceReport::failed("boom")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "boom"}));
    }
}
