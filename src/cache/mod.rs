//! In-memory response cache with time-based expiry
//!
//! This module provides a `ResponseCache` that maps request URLs to raw response
//! bodies. Lookups treat entries older than the configured TTL as absent, and a
//! background reaper task physically removes them on a fixed interval. The reaper
//! lives exactly as long as the cache that spawned it.

mod manager;
mod reaper;

pub use manager::ResponseCache;
