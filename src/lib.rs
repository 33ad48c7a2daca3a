//! Pokedex CLI Library
//!
//! A read-eval-print loop for browsing the PokeAPI location-area catalog,
//! built on a time-bounded response cache and a pagination cursor.

pub mod cache;
pub mod cli;
pub mod data;
pub mod logging;
pub mod repl;
