//! Ping command implementation

use crate::config::Config;
use crate::market::{CoinGeckoClient, MarketSource};
use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct PingArgs {}

impl PingArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = CoinGeckoClient::new(config.upstream.clone())?;
        let body = client
            .ping()
            .await
            .map_err(|e| anyhow::anyhow!("Upstream {} unreachable: {}", client.base_url(), e))?;

        println!("{}", body);
        Ok(())
    }
}
