//! Refresh command implementation

use crate::config::Config;
use crate::market::CoinGeckoClient;
use crate::refresh::RefreshJob;
use crate::store::PriceStore;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Clone, Default)]
pub struct RefreshArgs {
    /// Pretty-print the snapshot
    #[arg(long)]
    pub pretty: bool,
}

impl RefreshArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = CoinGeckoClient::new(config.upstream.clone())?;
        let job = RefreshJob::new(Arc::new(client), Arc::new(PriceStore::new()));

        let outcome = job.run().await;
        tracing::debug!(?outcome, "One-shot refresh done");

        let snapshot = job.store().snapshot().await;
        let json = if self.pretty {
            serde_json::to_string_pretty(snapshot.as_ref())?
        } else {
            serde_json::to_string(snapshot.as_ref())?
        };
        println!("{}", json);
        Ok(())
    }
}
