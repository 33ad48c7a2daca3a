//! Pokedex CLI - browse PokeAPI location areas from an interactive prompt
//!
//! Parses startup options, wires the response cache, fetcher and catalog
//! client together, then hands control to the command loop.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;
use tracing::debug;

use pokedex::cache::ResponseCache;
use pokedex::cli::{Cli, StartupConfig};
use pokedex::data::{CatalogClient, HttpFetcher};
use pokedex::logging::initialize_logging;
use pokedex::repl::{self, CommandRegistry, Session};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;

    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };
    debug!(?config, "starting pokedex");

    let cache = Arc::new(ResponseCache::new(config.cache_ttl));
    let fetcher = HttpFetcher::with_timeout(Arc::clone(&cache), config.request_timeout)?;
    let client = CatalogClient::with_base_url(fetcher, config.base_url);

    let registry = CommandRegistry::new();
    let mut session = Session::new(client);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    repl::run(&registry, &mut session, stdin, &mut stdout).await?;

    // The session holds the other reference to the cache
    drop(session);
    if let Ok(cache) = Arc::try_unwrap(cache) {
        cache.shutdown().await;
    }

    Ok(ExitCode::SUCCESS)
}
