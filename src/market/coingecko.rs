//! CoinGecko API client
//!
//! Three endpoints are used:
//! - `/coins/markets` for the market-cap ranked asset listing
//! - `/simple/price` for USD prices of a batch of ids
//! - `/ping` for the liveness check

use super::{AssetId, CoinMarket, MarketSource, PriceSnapshot, UpstreamError};
use crate::config::UpstreamConfig;
use crate::telemetry::{record_upstream_failure, UpstreamEndpoint};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// Client for the CoinGecko REST API
pub struct CoinGeckoClient {
    config: UpstreamConfig,
    client: Client,
}

impl CoinGeckoClient {
    /// Create a new client from upstream configuration
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Fetch the first page of markets ordered by market cap, descending
    pub async fn try_list_markets(&self) -> Result<Vec<CoinMarket>, UpstreamError> {
        let url = self.url("coins/markets");
        tracing::debug!(url = %url, "Fetching market listing");

        let per_page = self.config.per_page.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", self.config.vs_currency.as_str()),
                ("order", "market_cap_desc"),
                ("per_page", per_page.as_str()),
                ("page", "1"),
                ("sparkline", "false"),
            ])
            .send()
            .await?;

        let mut markets: Vec<CoinMarket> = Self::decode(response).await?;
        markets.truncate(self.config.per_page);
        Ok(markets)
    }

    /// Fetch prices for at most `max_price_ids` of the given ids
    ///
    /// Ids past the limit are dropped for this request.
    pub async fn try_fetch_prices(&self, ids: &[AssetId]) -> Result<PriceSnapshot, UpstreamError> {
        let url = self.url("simple/price");
        let batch = price_batch(ids, self.config.max_price_ids);

        if ids.len() > self.config.max_price_ids {
            tracing::debug!(
                requested = ids.len(),
                sent = self.config.max_price_ids,
                "Truncating price request"
            );
        }

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ids", batch.as_str()),
                ("vs_currencies", self.config.vs_currency.as_str()),
            ])
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Call `/ping` and return its body
    pub async fn try_ping(&self) -> Result<serde_json::Value, UpstreamError> {
        let url = self.url("ping");
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, UpstreamError> {
        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, url, body });
        }
        Ok(response.json().await?)
    }
}

/// Comma-joined leading `limit` ids for the `ids` query parameter
pub(crate) fn price_batch(ids: &[AssetId], limit: usize) -> String {
    ids.iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl MarketSource for CoinGeckoClient {
    async fn list_top_assets(&self) -> Vec<AssetId> {
        tracing::info!("Fetching top assets by market cap");

        match self.try_list_markets().await {
            Ok(markets) => {
                tracing::debug!(sample = ?&markets[..markets.len().min(5)], "Raw market records");
                let ids: Vec<AssetId> = markets.into_iter().map(|m| m.id).collect();
                tracing::info!(count = ids.len(), "Fetched asset listing");
                ids
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch asset listing");
                record_upstream_failure(UpstreamEndpoint::Markets);
                Vec::new()
            }
        }
    }

    async fn fetch_prices(&self, ids: &[AssetId]) -> PriceSnapshot {
        match self.try_fetch_prices(ids).await {
            Ok(prices) => {
                tracing::info!(count = prices.len(), "Fetched prices");
                prices
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch prices");
                record_upstream_failure(UpstreamEndpoint::SimplePrice);
                PriceSnapshot::new()
            }
        }
    }

    async fn ping(&self) -> Result<serde_json::Value, UpstreamError> {
        self.try_ping().await.inspect_err(|e| {
            tracing::warn!(error = %e, "Upstream ping failed");
            record_upstream_failure(UpstreamEndpoint::Ping);
        })
    }
}
