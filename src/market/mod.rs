//! Market data module
//!
//! Lists the top assets by market cap and fetches their USD prices from the
//! CoinGecko API

mod coingecko;
mod types;

pub use coingecko::CoinGeckoClient;
pub use types::{AssetId, CoinMarket, PriceSnapshot, UpstreamError};

use async_trait::async_trait;

/// Source of market listings and prices
///
/// `list_top_assets` and `fetch_prices` fail soft: upstream errors are logged
/// by the implementation and surface as an empty result. Only `ping` reports
/// the error to the caller.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Asset ids ranked by market cap, empty on upstream failure
    async fn list_top_assets(&self) -> Vec<AssetId>;
    /// USD prices for the leading ids, empty on upstream failure
    async fn fetch_prices(&self, ids: &[AssetId]) -> PriceSnapshot;
    /// Upstream liveness check
    async fn ping(&self) -> Result<serde_json::Value, UpstreamError>;
}
