//! Market data types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upstream asset identifier (e.g. "bitcoin")
pub type AssetId = String;

/// Asset id -> upstream price record, e.g. `{"bitcoin": {"usd": 50000}}`
///
/// Records are kept as raw JSON so the upstream body passes through as-is.
pub type PriceSnapshot = serde_json::Map<String, serde_json::Value>;

/// One row of the `/coins/markets` listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinMarket {
    pub id: AssetId,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
}

/// Upstream unavailable: transport failure, timeout, bad body or non-2xx status
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Request could not be sent or its body could not be decoded
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    /// Upstream answered with a non-success status
    #[error("{status} for url ({url}): {body}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
        body: String,
    },
}
