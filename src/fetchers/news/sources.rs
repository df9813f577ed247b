//! Individual news providers

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::NewsArticle;
use super::feed::fetch_feed;
use crate::fetchers::FetchError;
use crate::fetchers::http::ensure_success;
use crate::fetchers::tickers::search_terms;

/// A provider the aggregator can ask for articles about a ticker
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Label used in diagnostics
    fn name(&self) -> &str;

    /// Fetch at most `limit` articles about `ticker`
    async fn fetch(&self, ticker: &str, limit: usize) -> Result<Vec<NewsArticle>, FetchError>;
}

/// Google News RSS keyword search
pub struct GoogleNews {
    client: Client,
    url: String,
}

impl GoogleNews {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

/// Split a Google News headline of the form `Headline - Publisher`
fn split_publisher(raw: &str) -> (String, String) {
    match raw.rsplit_once(" - ") {
        Some((title, source)) => (title.to_string(), source.to_string()),
        None => (raw.to_string(), "Google News".to_string()),
    }
}

#[async_trait]
impl NewsSource for GoogleNews {
    fn name(&self) -> &str {
        "Google News"
    }

    async fn fetch(&self, ticker: &str, limit: usize) -> Result<Vec<NewsArticle>, FetchError> {
        let term = search_terms(ticker)
            .into_iter()
            .next()
            .unwrap_or_else(|| ticker.to_lowercase());
        let query = format!("{} cryptocurrency", term);

        let entries = fetch_feed(
            &self.client,
            &self.url,
            &[("q", query.as_str()), ("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")],
        )
        .await?;

        Ok(entries
            .into_iter()
            .take(limit)
            .map(|entry| {
                let raw_title = entry.title.unwrap_or_else(|| "No title".to_string());
                let (title, source) = split_publisher(&raw_title);
                NewsArticle::new(
                    title,
                    entry.link,
                    source,
                    entry.published,
                    entry.description.unwrap_or_default(),
                )
            })
            .collect())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PostsResponse {
    results: Vec<Post>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Post {
    title: Option<String>,
    url: Option<String>,
    source: Option<PostSource>,
    published_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PostSource {
    title: Option<String>,
}

/// CryptoPanic posts API, filtered by currency
pub struct CryptoPanic {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl CryptoPanic {
    pub fn new(client: Client, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl NewsSource for CryptoPanic {
    fn name(&self) -> &str {
        "CryptoPanic"
    }

    async fn fetch(&self, ticker: &str, limit: usize) -> Result<Vec<NewsArticle>, FetchError> {
        let currency = ticker.to_uppercase();
        let mut params = vec![("currencies", currency.as_str()), ("kind", "news"), ("public", "true")];
        if let Some(key) = self.api_key.as_deref() {
            params.push(("auth_token", key));
        }

        let response = self.client.get(&self.url).query(&params).send().await?;
        let body = ensure_success(response).await?.text().await?;
        let data: PostsResponse = serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        Ok(data
            .results
            .into_iter()
            .take(limit)
            .map(|post| {
                let title = post.title.unwrap_or_else(|| "No title".to_string());
                let source = post
                    .source
                    .and_then(|s| s.title)
                    .unwrap_or_else(|| "Unknown".to_string());
                // the API has no summaries, reuse the headline
                let description = title.clone();
                NewsArticle::new(
                    title,
                    post.url.unwrap_or_default(),
                    source,
                    post.published_at.unwrap_or_default(),
                    description,
                )
            })
            .collect())
    }
}

/// A general crypto news RSS feed, filtered locally by search terms
pub struct RssFeed {
    client: Client,
    label: String,
    url: String,
    scan_depth: usize,
}

impl RssFeed {
    pub fn new(client: Client, name: &str, url: impl Into<String>, scan_depth: usize) -> Self {
        Self {
            client,
            label: capitalize(name),
            url: url.into(),
            scan_depth,
        }
    }
}

/// Uppercase the first character, lowercase the rest
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl NewsSource for RssFeed {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch(&self, ticker: &str, limit: usize) -> Result<Vec<NewsArticle>, FetchError> {
        let terms = search_terms(ticker);
        let entries = fetch_feed(&self.client, &self.url, &[]).await?;

        Ok(entries
            .into_iter()
            .take(self.scan_depth)
            .filter(|entry| entry.mentions_any(&terms))
            .take(limit)
            .map(|entry| {
                NewsArticle::new(
                    entry.title.unwrap_or_else(|| "No title".to_string()),
                    entry.link,
                    self.label.clone(),
                    entry.published,
                    entry.description.unwrap_or_default(),
                )
            })
            .collect())
    }
}
