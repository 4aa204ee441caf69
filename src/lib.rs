//! coin-cache: cached cryptocurrency prices over HTTP
//!
//! This library provides the components for:
//! - Market-cap ranked asset listing and USD prices from CoinGecko
//! - An in-memory price store with whole-snapshot swaps
//! - A refresh job run at startup, on a timer and on demand
//! - The HTTP routes serving the cache
//! - Logging and Prometheus metrics

pub mod api;
pub mod cli;
pub mod config;
pub mod market;
pub mod refresh;
pub mod store;
pub mod telemetry;
