use eyre::{Context, Result, eyre};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::llm::AnthropicConfig;
use crate::llm::anthropic::{ANTHROPIC_API_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub llm: LlmConfig,
    pub http: HttpConfig,
    pub price: PriceConfig,
    pub news: NewsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    pub max_tool_rounds: u32,
    pub api_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_ms: 300000,
            max_tool_rounds: 10,
            api_url: ANTHROPIC_API_URL.to_string(),
        }
    }
}

impl LlmConfig {
    pub fn to_anthropic(&self) -> AnthropicConfig {
        AnthropicConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            timeout: Duration::from_millis(self.timeout_ms),
            api_url: self.api_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10000,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceConfig {
    pub api_url: String,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.coingecko.com/api/v3".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
}

impl FeedConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub google_news_url: String,
    pub cryptopanic_url: String,
    pub cryptopanic_api_key: Option<String>,
    pub rss_scan_depth: usize,
    pub rss_feeds: Vec<FeedConfig>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            google_news_url: "https://news.google.com/rss/search".to_string(),
            cryptopanic_url: "https://cryptopanic.com/api/v1/posts/".to_string(),
            cryptopanic_api_key: None,
            rss_scan_depth: 20,
            rss_feeds: vec![
                FeedConfig::new("cointelegraph", "https://cointelegraph.com/rss"),
                FeedConfig::new("coindesk", "https://www.coindesk.com/arc/outboundfeeds/rss/"),
                FeedConfig::new("bitcoinmagazine", "https://bitcoinmagazine.com/feed"),
            ],
        }
    }
}

impl Config {
    /// Level named by `log_level`, if one is set
    pub fn log_filter(&self) -> Result<Option<LevelFilter>> {
        match self.log_level.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(level) => level
                .parse::<LevelFilter>()
                .map(Some)
                .map_err(|_| eyre!("Invalid log_level '{}'", level)),
        }
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
