//! Tool dispatch
//!
//! Turns a tool name plus JSON arguments into a typed request, runs the
//! matching fetcher and serializes its report for the conversation.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};

use super::catalog::DEFAULT_MAX_ARTICLES;
use super::definition::ToolKind;
use crate::error::{ResearchError, Result};
use crate::fetchers::{NewsAggregator, PriceFetcher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceArgs {
    pub ticker: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsArgs {
    pub ticker: String,
    pub max_articles: usize,
}

/// A parsed tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    Price(PriceArgs),
    News(NewsArgs),
    /// A name outside the catalog; answered with an error payload, not a failure
    Unknown(String),
}

impl ToolRequest {
    /// Validate `input` against the arguments of the tool called `name`
    pub fn parse(name: &str, input: &Value) -> Result<Self> {
        match ToolKind::from_name(name) {
            Some(ToolKind::Price) => Ok(Self::Price(PriceArgs {
                ticker: ticker_arg(name, input)?,
            })),
            Some(ToolKind::News) => Ok(Self::News(NewsArgs {
                ticker: ticker_arg(name, input)?,
                max_articles: max_articles_arg(name, input),
            })),
            None => Ok(Self::Unknown(name.to_string())),
        }
    }
}

fn ticker_arg(tool: &str, input: &Value) -> Result<String> {
    match input.get("ticker") {
        None | Some(Value::Null) => Err(ResearchError::missing_argument(tool, "ticker")),
        Some(Value::String(ticker)) if ticker.trim().is_empty() => {
            Err(ResearchError::invalid_argument(tool, "ticker", "must not be empty"))
        }
        Some(Value::String(ticker)) => Ok(ticker.trim().to_string()),
        Some(other) => Err(ResearchError::invalid_argument(
            tool,
            "ticker",
            format!("expected a string, got {}", other),
        )),
    }
}

/// Whole non-negative counts are accepted as integers, integral floats or numeric strings
fn article_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn max_articles_arg(tool: &str, input: &Value) -> usize {
    let value = match input.get("max_articles") {
        None | Some(Value::Null) => return DEFAULT_MAX_ARTICLES as usize,
        Some(value) => value,
    };
    match article_count(value) {
        Some(n) => n as usize,
        None => {
            log::warn!(
                "{} got unusable max_articles {}, using {}",
                tool,
                value,
                DEFAULT_MAX_ARTICLES
            );
            DEFAULT_MAX_ARTICLES as usize
        }
    }
}

/// Executes tool calls on behalf of the agent loop
#[async_trait]
pub trait ToolDispatcher: Send + Sync {
    /// Run the named tool and return its output as text for the model
    async fn dispatch(&self, name: &str, input: &Value) -> Result<String>;
}

/// Dispatcher backed by the live price and news fetchers
pub struct FetcherDispatcher {
    price: PriceFetcher,
    news: NewsAggregator,
}

impl FetcherDispatcher {
    pub fn new(price: PriceFetcher, news: NewsAggregator) -> Self {
        Self { price, news }
    }

    /// Execute an already parsed request
    pub async fn execute(&self, request: &ToolRequest) -> Result<String> {
        match request {
            ToolRequest::Price(args) => render(&self.price.fetch(&args.ticker).await),
            ToolRequest::News(args) => render(&self.news.fetch(&args.ticker, args.max_articles).await),
            ToolRequest::Unknown(name) => {
                log::warn!("Model requested unknown tool: {}", name);
                render(&json!({ "error": format!("Unknown tool: {}", name) }))
            }
        }
    }
}

#[async_trait]
impl ToolDispatcher for FetcherDispatcher {
    async fn dispatch(&self, name: &str, input: &Value) -> Result<String> {
        let request = ToolRequest::parse(name, input)?;
        log::info!("Dispatching {:?}", request);
        self.execute(&request).await
    }
}

/// Two-space indented JSON, the format tool results are sent in
pub fn render<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
