//! Caching HTTP fetcher
//!
//! Issues GET requests for raw response bodies, consulting the shared
//! `ResponseCache` first and populating it after each successful fetch.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::cache::ResponseCache;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when fetching a URL
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or did not complete
    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with anything other than 200 OK
    #[error("bad status: {status} for {url}")]
    BadStatus { status: StatusCode, url: String },

    /// The response body could not be read fully
    #[error("failed to read response body: {0}")]
    Read(#[source] reqwest::Error),
}

/// Read-through HTTP fetcher backed by a `ResponseCache`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    cache: Arc<ResponseCache>,
}

impl HttpFetcher {
    /// Creates a fetcher with the default timeout
    pub fn new(cache: Arc<ResponseCache>) -> Result<Self, FetchError> {
        Self::with_timeout(cache, DEFAULT_TIMEOUT)
    }

    /// Creates a fetcher whose requests fail with `Transport` after `timeout`
    pub fn with_timeout(cache: Arc<ResponseCache>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pokedex/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Transport)?;
        Ok(Self::with_client(client, cache))
    }

    /// Creates a fetcher with a custom HTTP client
    pub fn with_client(client: Client, cache: Arc<ResponseCache>) -> Self {
        Self { client, cache }
    }

    /// The cache this fetcher reads from and writes to
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Returns the body of `url`, from cache when fresh, otherwise from the network
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - The raw response body
    /// * `Err(FetchError)` - If the request, status check or body read fails;
    ///   nothing is cached in that case
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if let Some(body) = self.cache.get(url) {
            debug!(url, "cache hit");
            return Ok(body);
        }
        debug!(url, "cache miss, fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::BadStatus {
                status,
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(FetchError::Read)?.to_vec();

        self.cache.add(url, body.clone());
        Ok(body)
    }
}
