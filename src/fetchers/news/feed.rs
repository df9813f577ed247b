//! RSS feed retrieval and entry normalization

use chrono::DateTime;
use reqwest::Client;
use reqwest::header::ACCEPT;

use crate::fetchers::FetchError;
use crate::fetchers::http::{FEED_ACCEPT, ensure_success};

/// One item from an RSS channel, with dates already normalized
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: String,
    pub description: Option<String>,
    pub published: String,
}

impl FeedEntry {
    /// Whether any of the lowercase `terms` occurs in the title or description
    pub fn mentions_any(&self, terms: &[String]) -> bool {
        let title = self.title.as_deref().unwrap_or_default().to_lowercase();
        let description = self.description.as_deref().unwrap_or_default().to_lowercase();
        terms
            .iter()
            .any(|term| title.contains(term.as_str()) || description.contains(term.as_str()))
    }
}

/// Parse an RSS document into its entries, in document order
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedEntry>, FetchError> {
    let channel = rss::Channel::read_from(bytes).map_err(|e| FetchError::Parse(e.to_string()))?;

    Ok(channel
        .items()
        .iter()
        .map(|item| FeedEntry {
            title: item.title().map(str::to_string),
            link: item.link().unwrap_or_default().to_string(),
            description: item.description().map(str::to_string),
            published: item.pub_date().map(normalize_date).unwrap_or_default(),
        })
        .collect())
}

/// Convert an RFC 2822 feed date to UTC `YYYY-MM-DDTHH:MM:SS`
///
/// Dates that don't parse are returned verbatim.
pub fn normalize_date(raw: &str) -> String {
    match DateTime::parse_from_rfc2822(raw.trim()) {
        Ok(date) => date.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// GET a feed and parse it
pub async fn fetch_feed(client: &Client, url: &str, query: &[(&str, &str)]) -> Result<Vec<FeedEntry>, FetchError> {
    log::debug!("Fetching feed {}", url);

    let response = client.get(url).query(query).header(ACCEPT, FEED_ACCEPT).send().await?;
    let bytes = ensure_success(response).await?.bytes().await?;

    parse_feed(&bytes)
}
