//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - research: run the AI research agent for a ticker
//! - price: show market data without the agent
//! - news: show recent news without the agent
//! - supported: list tickers with known CoinGecko ids

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AI-powered cryptocurrency research agent
#[derive(Parser, Debug)]
#[command(name = "crypto-research")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Research a cryptocurrency and generate an AI-powered analysis report
    Research {
        /// Cryptocurrency ticker symbol (e.g., BTC, ETH, SOL)
        ticker: String,

        /// Provide more detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Show the tools called before the report
        #[arg(short, long)]
        raw: bool,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch and display current price data for a cryptocurrency
    Price {
        /// Cryptocurrency ticker symbol (e.g., BTC, ETH, SOL)
        ticker: String,
    },

    /// Fetch and display recent news for a cryptocurrency
    News {
        /// Cryptocurrency ticker symbol (e.g., BTC, ETH, SOL)
        ticker: String,

        /// Maximum number of articles to fetch
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// List all supported cryptocurrency tickers
    Supported,
}
