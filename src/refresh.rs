//! Refresh job
//!
//! One refresh cycle lists the top assets, fetches their prices and swaps the
//! result into the [`PriceStore`]. The cycle runs at startup, on a fixed
//! interval from [`RefreshJob::spawn_scheduler`], and on demand from the
//! `/update` route. All three share [`RefreshJob::run`], so concurrent runs
//! race only on the final atomic swap.

use crate::market::MarketSource;
use crate::store::PriceStore;
use crate::telemetry::record_refresh;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, MissedTickBehavior};

/// Result of one refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Store replaced with a fetch of `entries` prices (may be zero)
    Replaced { entries: usize },
    /// Listing came back empty, store left untouched
    Skipped,
}

/// Orchestrates market listing, price fetch and store write
#[derive(Clone)]
pub struct RefreshJob {
    source: Arc<dyn MarketSource>,
    store: Arc<PriceStore>,
}

impl RefreshJob {
    pub fn new(source: Arc<dyn MarketSource>, store: Arc<PriceStore>) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &Arc<PriceStore> {
        &self.store
    }

    pub fn source(&self) -> &Arc<dyn MarketSource> {
        &self.source
    }

    /// Run one full refresh cycle
    ///
    /// An empty listing leaves the store as is. A non-empty listing always
    /// replaces the store, even when the price fetch came back empty.
    pub async fn run(&self) -> RefreshOutcome {
        tracing::info!("Starting price refresh");
        let started = Instant::now();

        let ids = self.source.list_top_assets().await;
        let outcome = if ids.is_empty() {
            RefreshOutcome::Skipped
        } else {
            let prices = self.source.fetch_prices(&ids).await;
            let entries = prices.len();
            self.store.replace(prices).await;
            RefreshOutcome::Replaced { entries }
        };

        let snapshot = self.store.snapshot().await;
        let updated_at = self.store.updated_at().await;
        record_refresh(outcome, started.elapsed(), snapshot.len());
        tracing::info!(
            ?outcome,
            cached = snapshot.len(),
            updated_at = ?updated_at,
            "Price refresh finished"
        );
        tracing::debug!(?snapshot, "Cached prices");

        outcome
    }

    /// Spawn a task that runs the job every `period`, first one `period` from now
    pub fn spawn_scheduler(&self, period: Duration) -> JoinHandle<()> {
        let job = self.clone();

        tokio::spawn(async move {
            let mut ticker = interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(period_secs = period.as_secs(), "Refresh scheduler started");
            loop {
                ticker.tick().await;
                job.run().await;
            }
        })
    }
}
