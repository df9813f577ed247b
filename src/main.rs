use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crypto_research::ResearchError;
use crypto_research::agent::{AgentConfig, ResearchAgent};
use crypto_research::config::Config;
use crypto_research::display;
use crypto_research::fetchers::http::build_client;
use crypto_research::fetchers::{NewsAggregator, PriceFetcher, tickers};
use crypto_research::llm::AnthropicClient;
use crypto_research::tools::FetcherDispatcher;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use cli::spinner::with_spinner;

/// Returns true when `RUST_LOG` controls filtering
fn setup_logging() -> Result<bool> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("crypto-research")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("crypto-research.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // Without RUST_LOG the logger passes every record and the global max level filters
    let from_env = std::env::var_os("RUST_LOG").is_some();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace"))
        .target(env_logger::Target::Pipe(target))
        .init();
    if !from_env {
        log::set_max_level(LevelFilter::Info);
    }

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(from_env)
}

fn apply_log_level(config: &Config) {
    match config.log_filter() {
        Ok(Some(level)) => {
            log::set_max_level(level);
            info!("Log level set to {} from config", level);
        }
        Ok(None) => {}
        Err(e) => warn!("{}, keeping info", e),
    }
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    match &cli.command {
        Commands::Research {
            ticker,
            detailed,
            raw,
            json,
        } => handle_research_command(ticker, *detailed, *raw, *json, config).await,
        Commands::Price { ticker } => handle_price_command(ticker, config).await,
        Commands::News { ticker, limit } => handle_news_command(ticker, *limit, cli.is_verbose(), config).await,
        Commands::Supported => {
            display::print_header();
            display::print_supported(&tickers::supported());
            Ok(())
        }
    }
}

fn build_dispatcher(config: &Config) -> Result<FetcherDispatcher> {
    let client = build_client(&config.http)?;
    Ok(FetcherDispatcher::new(
        PriceFetcher::new(client.clone(), &config.price),
        NewsAggregator::from_config(client, &config.news),
    ))
}

async fn handle_research_command(ticker: &str, detailed: bool, raw: bool, json: bool, config: &Config) -> Result<()> {
    let ticker = ticker.to_uppercase();
    info!("Research requested for {} (detailed: {})", ticker, detailed);

    if !json {
        display::print_header();
        println!("{} {}", "Researching:".bold(), ticker.cyan());
        println!();
    }

    let llm = match AnthropicClient::new(config.llm.to_anthropic()).map_err(ResearchError::from) {
        Ok(client) => client,
        Err(e) if e.is_config() => {
            display::print_error(
                "Configuration Error",
                &format!(
                    "{}\n\nMake sure you have set the ANTHROPIC_API_KEY environment variable.",
                    e
                ),
            );
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to create Anthropic client"),
    };

    let agent = ResearchAgent::with_config(
        Arc::new(llm),
        Arc::new(build_dispatcher(config)?),
        AgentConfig {
            max_tokens: config.llm.max_tokens,
            max_tool_rounds: config.llm.max_tool_rounds,
        },
    );

    let result = with_spinner("Fetching price data and news...", !json, agent.run(&ticker, detailed)).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        display::print_research(&result, raw);
    } else {
        display::print_error("Research Failed", result.error.as_deref().unwrap_or("Unknown error"));
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

async fn handle_price_command(ticker: &str, config: &Config) -> Result<()> {
    let ticker = ticker.to_uppercase();
    info!("Price requested for {}", ticker);
    display::print_header();

    let fetcher = PriceFetcher::new(build_client(&config.http)?, &config.price);
    let report = with_spinner(
        format!("Fetching price data for {}...", ticker),
        true,
        fetcher.fetch(&ticker),
    )
    .await;

    match (&report.quote, report.success) {
        (Some(quote), true) => {
            display::print_price(quote);
            Ok(())
        }
        _ => {
            display::print_error("Error", report.error.as_deref().unwrap_or("Unknown error"));
            std::process::exit(1);
        }
    }
}

async fn handle_news_command(ticker: &str, limit: usize, verbose: bool, config: &Config) -> Result<()> {
    let ticker = ticker.to_uppercase();
    info!("News requested for {} (limit: {})", ticker, limit);
    display::print_header();

    let aggregator = NewsAggregator::from_config(build_client(&config.http)?, &config.news);
    let report = with_spinner(
        format!("Fetching news for {}...", ticker),
        true,
        aggregator.fetch(&ticker, limit),
    )
    .await;

    if verbose {
        display::print_sources(&report.sources);
    }
    display::print_news(&report);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_from_env = setup_logging().context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if !log_from_env {
        apply_log_level(&config);
    }

    info!("Starting with config from: {:?}", cli.config);

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
