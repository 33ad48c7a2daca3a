//! PokeAPI location-area catalog client
//!
//! Decodes the raw bodies returned by `HttpFetcher` into typed catalog pages
//! and area details, and moves a `Cursor` forwards and backwards through the
//! catalog using the links the service returned.

use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use super::cursor::{Boundary, Cursor};
use super::fetcher::{FetchError, HttpFetcher};
use super::{LocationAreaDetail, LocationAreaPage};

/// Base URL for the PokeAPI
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Errors that can occur when reading the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Fetching the resource failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The body was not valid JSON or lacked required fields
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request URL could not be built from the base URL and the given name
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

/// Outcome of a forward or backward navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// A page was fetched and the cursor now points at it
    Page(LocationAreaPage),
    /// No page exists in that direction; nothing was fetched
    Boundary(Boundary),
}

/// Client for the location-area endpoints
#[derive(Debug, Clone)]
pub struct CatalogClient {
    fetcher: HttpFetcher,
    base_url: String,
}

impl CatalogClient {
    /// Creates a client against the public PokeAPI
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self::with_base_url(fetcher, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL (trailing slashes are ignored)
    pub fn with_base_url(fetcher: HttpFetcher, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { fetcher, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the first catalog page
    pub fn first_page_url(&self) -> String {
        format!("{}/location-area", self.base_url)
    }

    /// URL of a single area's details
    ///
    /// `name` always becomes exactly one percent-encoded path segment, so
    /// `/`, `?` or `#` in it cannot point the request at another resource.
    pub fn area_url(&self, name: &str) -> Result<Url, CatalogError> {
        if name.is_empty() || name == "." || name == ".." {
            return Err(CatalogError::InvalidUrl(format!("bad area name '{name}'")));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|err| CatalogError::InvalidUrl(format!("{}: {err}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("location-area")
            .push(name);
        Ok(url)
    }

    /// Fetches and decodes one catalog page
    ///
    /// # Arguments
    /// * `page_url` - A `next`/`previous` link from an earlier page, or `None`
    ///   for the first page
    pub async fn list_page(&self, page_url: Option<&str>) -> Result<LocationAreaPage, CatalogError> {
        let url = match page_url {
            Some(url) => url.to_string(),
            None => self.first_page_url(),
        };
        let page: LocationAreaPage = self.fetch_json(&url).await?;
        debug!(url = %url, areas = page.results.len(), "loaded catalog page");
        Ok(page)
    }

    /// Moves the cursor one page forward
    ///
    /// Loads the first page if nothing has been loaded yet. Returns
    /// `Boundary::LastPage` without fetching when the current page has no `next` link.
    pub async fn advance(&self, cursor: &mut Cursor) -> Result<Navigation, CatalogError> {
        let target = if cursor.is_loaded() {
            match cursor.next_url() {
                Some(url) => Some(url.to_string()),
                None => {
                    info!("already on the last page");
                    return Ok(Navigation::Boundary(Boundary::LastPage));
                }
            }
        } else {
            None
        };

        let page = self.list_page(target.as_deref()).await?;
        cursor.update(&page);
        Ok(Navigation::Page(page))
    }

    /// Moves the cursor one page back
    ///
    /// Returns `Boundary::FirstPage` without fetching when there is no `previous` link,
    /// which includes the case where no page has been loaded.
    pub async fn rewind(&self, cursor: &mut Cursor) -> Result<Navigation, CatalogError> {
        let Some(target) = cursor.previous_url().map(str::to_string) else {
            info!("already on the first page");
            return Ok(Navigation::Boundary(Boundary::FirstPage));
        };

        let page = self.list_page(Some(&target)).await?;
        cursor.update(&page);
        Ok(Navigation::Page(page))
    }

    /// Fetches the Pokemon encounters of one location area
    pub async fn get_area(&self, name: &str) -> Result<LocationAreaDetail, CatalogError> {
        let url = self.area_url(name)?;
        let mut detail: LocationAreaDetail = self.fetch_json(url.as_str()).await?;
        if detail.name.is_empty() {
            detail.name = name.to_string();
        }
        Ok(detail)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let body = self.fetcher.fetch(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
