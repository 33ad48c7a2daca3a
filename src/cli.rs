//! Command-line interface parsing for the Pokedex CLI
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated `StartupConfig` for the cache, fetcher and catalog client.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::data::DEFAULT_BASE_URL;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// A cache TTL of zero would expire every entry on insertion
    #[error("Invalid cache TTL: must be at least 1 second")]
    ZeroCacheTtl,

    /// A request timeout of zero would fail every request
    #[error("Invalid timeout: must be at least 1 second")]
    ZeroTimeout,

    /// The base URL is not an http(s) URL
    #[error("Invalid base URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidBaseUrl(String),
}

/// Pokedex - browse PokeAPI location areas from an interactive prompt
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse PokeAPI location areas from an interactive prompt")]
#[command(version)]
pub struct Cli {
    /// How long fetched responses stay cached, in seconds
    #[arg(long, value_name = "SECS", env = "POKEDEX_CACHE_TTL", default_value_t = 5)]
    pub cache_ttl: u64,

    /// Base URL of the PokeAPI
    #[arg(long, value_name = "URL", env = "POKEDEX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// Log cache and request activity to stderr
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Time-to-live of cached responses
    pub cache_ttl: Duration,
    /// PokeAPI base URL, without a trailing slash
    pub base_url: String,
    /// Timeout applied to every outbound request
    pub request_timeout: Duration,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(5),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with durations and a normalized base URL
    /// * `Err(CliError)` if a value is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.cache_ttl == 0 {
            return Err(CliError::ZeroCacheTtl);
        }
        if cli.timeout == 0 {
            return Err(CliError::ZeroTimeout);
        }

        let base_url = cli.base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(CliError::InvalidBaseUrl(cli.base_url.clone()));
        }

        Ok(StartupConfig {
            cache_ttl: Duration::from_secs(cli.cache_ttl),
            base_url: base_url.to_string(),
            request_timeout: Duration::from_secs(cli.timeout),
        })
    }
}
