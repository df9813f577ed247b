//! The fixed catalog of research tools

use serde_json::json;

use super::definition::{ParamSpec, ParamType, ToolDescriptor, ToolKind};
use crate::llm::ToolDefinition;

const TICKER_DESCRIPTION: &str =
    "The cryptocurrency ticker symbol (e.g., 'BTC' for Bitcoin, 'ETH' for Ethereum, 'SOL' for Solana)";

/// Default `max_articles` for the news tool
pub const DEFAULT_MAX_ARTICLES: u64 = 5;

/// Tool descriptors in the order they are advertised
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<ToolDescriptor>,
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolCatalog {
    pub fn new() -> Self {
        let price = ToolDescriptor {
            kind: ToolKind::Price,
            description: "Fetches current price and market data for a cryptocurrency from CoinGecko. \
                Returns current price in USD, 24h/7d/30d price changes, market cap, \
                trading volume, and other market statistics.",
            params: vec![ParamSpec::required("ticker", ParamType::String, TICKER_DESCRIPTION)],
        };

        let news = ToolDescriptor {
            kind: ToolKind::News,
            description: "Fetches recent news articles about a cryptocurrency from various sources \
                including CryptoPanic and major crypto news RSS feeds. Returns article titles, \
                URLs, sources, and publication dates.",
            params: vec![
                ParamSpec::required("ticker", ParamType::String, TICKER_DESCRIPTION),
                ParamSpec::optional(
                    "max_articles",
                    ParamType::Integer,
                    "Maximum number of news articles to fetch (default: 5)",
                    json!(DEFAULT_MAX_ARTICLES),
                ),
            ],
        };

        Self {
            tools: vec![price, news],
        }
    }

    /// Definitions sent with every completion request
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(ToolDescriptor::to_llm_definition).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
