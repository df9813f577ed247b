//! Shared fixtures for integration tests

#![allow(dead_code)]

use crypto_research::config::{Config, FeedConfig};
use serde_json::{Value, json};
use wiremock::MockServer;

/// Config with every provider pointed at `server`
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.price.api_url = format!("{}/api/v3", server.uri());
    config.news.google_news_url = format!("{}/rss/search", server.uri());
    config.news.cryptopanic_url = format!("{}/api/v1/posts/", server.uri());
    config.news.cryptopanic_api_key = Some("test-token".to_string());
    config.news.rss_feeds = vec![
        FeedConfig::new("cointelegraph", format!("{}/feeds/cointelegraph", server.uri())),
        FeedConfig::new("coindesk", format!("{}/feeds/coindesk", server.uri())),
    ];
    config
}

/// RSS document with one item per (title, description) pair
pub fn rss_feed(items: &[(&str, &str)]) -> String {
    let body: String = items
        .iter()
        .enumerate()
        .map(|(i, (title, description))| {
            format!(
                "<item><title>{}</title><link>https://news.example/{}</link>\
                 <description>{}</description><pubDate>Mon, 15 Jan 2024 08:00:00 GMT</pubDate></item>",
                title, i, description
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><rss version=\"2.0\"><channel>\
         <title>feed</title><link>https://news.example</link><description>feed</description>{}</channel></rss>",
        body
    )
}

/// CoinGecko `/coins/bitcoin` payload
pub fn bitcoin_market_data() -> Value {
    json!({
        "id": "bitcoin",
        "symbol": "btc",
        "name": "Bitcoin",
        "last_updated": "2024-05-01T12:00:00.000Z",
        "market_data": {
            "current_price": { "usd": 67234.56 },
            "price_change_percentage_24h": 2.15,
            "price_change_percentage_7d": -1.3,
            "price_change_percentage_30d": 8.4,
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
