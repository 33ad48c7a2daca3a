//! Core data models and API clients for the Pokedex CLI
//!
//! This module contains the response types decoded from PokeAPI, the caching
//! HTTP fetcher, the pagination cursor and the catalog client that ties them
//! together.

pub mod catalog;
pub mod cursor;
pub mod fetcher;

pub use catalog::{CatalogClient, CatalogError, Navigation, DEFAULT_BASE_URL};
pub use cursor::{Boundary, Cursor, PageState};
pub use fetcher::{FetchError, HttpFetcher};

use serde::Deserialize;

/// A named link to another PokeAPI resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One page of the location-area catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocationAreaPage {
    /// Total number of location areas in the catalog
    pub count: u64,
    /// Link to the following page, absent on the last page
    pub next: Option<String>,
    /// Link to the preceding page, absent on the first page
    pub previous: Option<String>,
    /// Areas on this page, in catalog order
    pub results: Vec<NamedResource>,
}

impl LocationAreaPage {
    /// Names of the areas on this page, in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|area| area.name.as_str())
    }
}

/// A Pokemon that can be encountered in a location area
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PokemonEncounter {
    pub pokemon: NamedResource,
}

/// Details of a single location area
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocationAreaDetail {
    #[serde(default)]
    pub name: String,
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

impl LocationAreaDetail {
    /// `(name, url)` pairs of the Pokemon found in this area, in response order
    pub fn pokemon(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pokemon_encounters
            .iter()
            .map(|encounter| (encounter.pokemon.name.as_str(), encounter.pokemon.url.as_str()))
    }
}
