//! CLI module for crypto-research - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for agent research and
//! direct price and news lookups.

pub mod commands;
pub mod spinner;

pub use commands::Cli;
