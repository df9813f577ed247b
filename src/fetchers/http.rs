//! Shared HTTP plumbing for the data providers

use reqwest::{Client, Response, StatusCode};

use super::FetchError;
use crate::config::HttpConfig;
use crate::error::{ResearchError, Result};

/// Accept header sent when requesting RSS feeds
pub const FEED_ACCEPT: &str = "application/rss+xml, application/xml, text/xml, */*";

/// Build the client shared by all data fetchers
///
/// Every request made through it is bounded by the configured timeout.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| ResearchError::Http(format!("Failed to create HTTP client: {}", e)))
}

/// Turn non-2xx responses into a FetchError
pub async fn ensure_success(response: Response) -> std::result::Result<Response, FetchError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(FetchError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response)
}
