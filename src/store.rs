//! In-memory price store
//!
//! Holds the latest [`PriceSnapshot`] behind an `Arc` that is swapped whole on
//! every write, so readers never see a partially written snapshot.

use crate::market::PriceSnapshot;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared store for the most recent price snapshot
#[derive(Debug, Default)]
pub struct PriceStore {
    inner: RwLock<StoreState>,
}

#[derive(Debug, Default)]
struct StoreState {
    snapshot: Arc<PriceSnapshot>,
    updated_at: Option<DateTime<Utc>>,
}

impl PriceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `snapshot`
    pub fn with_snapshot(snapshot: PriceSnapshot) -> Self {
        Self {
            inner: RwLock::new(StoreState {
                snapshot: Arc::new(snapshot),
                updated_at: Some(Utc::now()),
            }),
        }
    }

    /// Current snapshot
    pub async fn snapshot(&self) -> Arc<PriceSnapshot> {
        self.inner.read().await.snapshot.clone()
    }

    /// Replace the whole snapshot, returning the previous one
    pub async fn replace(&self, snapshot: PriceSnapshot) -> Arc<PriceSnapshot> {
        let next = Arc::new(snapshot);
        let mut state = self.inner.write().await;
        state.updated_at = Some(Utc::now());
        std::mem::replace(&mut state.snapshot, next)
    }

    /// Time of the last replace, `None` if never written
    pub async fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.updated_at
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.snapshot.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
