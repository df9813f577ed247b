//! crypto-research - an AI research agent for cryptocurrencies
//!
//! A language model is given two tools, a CoinGecko price lookup and a
//! multi-source news aggregator, and calls them in a loop until it can write
//! a research brief for the requested ticker.

pub mod agent;
pub mod config;
pub mod display;
pub mod error;
pub mod fetchers;
pub mod llm;
pub mod tools;

pub use error::{ResearchError, Result};
