//! Multi-source news aggregation
//!
//! Sources are asked in priority order, each only for the articles still
//! missing. A failing source counts as zero articles and never aborts the
//! aggregation.

pub mod feed;
pub mod sources;

use std::fmt;

use reqwest::Client;
use serde::{Deserialize, Serialize};

pub use sources::{CryptoPanic, GoogleNews, NewsSource, RssFeed};

use super::truncate_chars;
use crate::config::NewsConfig;

/// Maximum description length kept per article
pub const DESCRIPTION_LIMIT: usize = 300;

/// Environment variable consulted when no CryptoPanic key is configured
pub const CRYPTOPANIC_KEY_ENV: &str = "CRYPTOPANIC_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: String,
    pub description: String,
}

impl NewsArticle {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
        published_at: impl Into<String>,
        description: impl AsRef<str>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            source: source.into(),
            published_at: published_at.into(),
            description: truncate_chars(description.as_ref(), DESCRIPTION_LIMIT),
        }
    }
}

/// What happened when a single source was consulted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Fetched(usize),
    Failed(String),
    /// Not asked because enough articles were already collected
    Skipped,
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStatus::Fetched(n) => write!(f, "fetched {}", n),
            SourceStatus::Failed(reason) => write!(f, "failed: {}", reason),
            SourceStatus::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub source: String,
    pub status: SourceStatus,
}

/// Result of a news lookup
///
/// Always successful; an empty article list comes with an explanatory `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsReport {
    pub success: bool,
    pub ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_count: Option<usize>,
    pub articles: Vec<NewsArticle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip)]
    pub sources: Vec<SourceReport>,
}

/// Walks the configured sources until enough articles are found
pub struct NewsAggregator {
    sources: Vec<Box<dyn NewsSource>>,
}

impl NewsAggregator {
    pub fn with_sources(sources: Vec<Box<dyn NewsSource>>) -> Self {
        Self { sources }
    }

    /// Google News first, then CryptoPanic, then each configured RSS feed
    pub fn from_config(client: Client, config: &NewsConfig) -> Self {
        let api_key = config
            .cryptopanic_api_key
            .clone()
            .or_else(|| std::env::var(CRYPTOPANIC_KEY_ENV).ok())
            .filter(|key| !key.is_empty());

        let mut sources: Vec<Box<dyn NewsSource>> = vec![
            Box::new(GoogleNews::new(client.clone(), config.google_news_url.clone())),
            Box::new(CryptoPanic::new(client.clone(), config.cryptopanic_url.clone(), api_key)),
        ];
        for feed in &config.rss_feeds {
            sources.push(Box::new(RssFeed::new(
                client.clone(),
                &feed.name,
                feed.url.clone(),
                config.rss_scan_depth,
            )));
        }

        Self::with_sources(sources)
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Collect up to `max_articles` recent articles about `ticker`
    pub async fn fetch(&self, ticker: &str, max_articles: usize) -> NewsReport {
        let ticker_upper = ticker.to_uppercase();
        let mut articles: Vec<NewsArticle> = Vec::new();
        let mut reports = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let remaining = max_articles.saturating_sub(articles.len());
            if remaining == 0 {
                reports.push(SourceReport {
                    source: source.name().to_string(),
                    status: SourceStatus::Skipped,
                });
                continue;
            }

            let status = match source.fetch(ticker, remaining).await {
                Ok(found) => {
                    log::debug!("{} returned {} articles for {}", source.name(), found.len(), ticker_upper);
                    let count = found.len();
                    articles.extend(found);
                    SourceStatus::Fetched(count)
                }
                Err(e) => {
                    log::warn!("News source {} failed for {}: {}", source.name(), ticker_upper, e);
                    SourceStatus::Failed(e.to_string())
                }
            };
            reports.push(SourceReport {
                source: source.name().to_string(),
                status,
            });
        }

        articles.truncate(max_articles);

        if articles.is_empty() {
            log::info!("No news found for {}", ticker_upper);
            return NewsReport {
                success: true,
                message: Some(format!(
                    "No recent news found for {}. This could be a less popular cryptocurrency.",
                    ticker_upper
                )),
                ticker: ticker_upper,
                article_count: None,
                articles,
                sources: reports,
            };
        }

        NewsReport {
            success: true,
            ticker: ticker_upper,
            article_count: Some(articles.len()),
            articles,
            message: None,
            sources: reports,
        }
    }
}
