//! Data fetchers - price lookup and multi-source news aggregation
//!
//! Fetchers never return errors to their callers: provider failures are
//! folded into the structured report each fetcher produces.

pub mod http;
pub mod news;
pub mod price;
pub mod tickers;

pub use news::{NewsAggregator, NewsArticle, NewsReport, NewsSource, SourceReport, SourceStatus};
pub use price::{PriceFetcher, PriceQuote, PriceReport};

/// Failure talking to a data provider
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("resource not found")]
    NotFound,

    #[error("{status} - {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Parse(String),
}

/// Keep at most `max` characters of `text`
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
