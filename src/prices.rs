//! # prices — append-only price history store
//!
//! Time-series of [`PriceObservation`] per asset.  The poll cycle is the only
//! writer; the alert cycle and the valuation endpoint read it.
//!
//! Each asset keeps a bounded ring (`VecDeque`, newest at the back) so the
//! process can run for weeks without growing unbounded.  Within the ring the
//! store is append-only: observations are never mutated or reordered.

use std::collections::{HashMap, VecDeque};

use tokio::sync::RwLock;
use tracing::debug;

use crate::models::PriceObservation;

pub struct PriceStore {
    /// Max observations kept per asset
    cap: usize,
    inner: RwLock<HashMap<String, VecDeque<PriceObservation>>>,
}

impl PriceStore {
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Append one observation for `asset`, stamped now.
    pub async fn record(&self, asset: &str, price: f64) -> PriceObservation {
        let obs = PriceObservation::new(asset, price);

        let mut inner = self.inner.write().await;
        let series = inner
            .entry(asset.to_string())
            .or_insert_with(|| VecDeque::with_capacity(self.cap.min(64) + 1));

        if series.len() >= self.cap {
            series.pop_front(); // drop oldest
        }
        series.push_back(obs.clone());

        debug!(asset, price, "price recorded");
        obs
    }

    /// Most recent observation for one asset.
    pub async fn latest(&self, asset: &str) -> Option<PriceObservation> {
        let inner = self.inner.read().await;
        inner.get(asset).and_then(|s| s.back().cloned())
    }

    /// Most recent observation for every asset the store has seen.
    /// Sorted by asset name so the response is stable.
    pub async fn latest_all(&self) -> Vec<PriceObservation> {
        let inner = self.inner.read().await;
        let mut out: Vec<PriceObservation> = inner
            .values()
            .filter_map(|s| s.back().cloned())
            .collect();
        out.sort_by(|a, b| a.asset.cmp(&b.asset));
        out
    }

    /// Latest price per asset as a plain map.
    ///
    /// Taken under a single read-lock acquisition, so the alert cycle sees a
    /// consistent snapshot — no asset is read mid-update from the poll cycle.
    pub async fn latest_snapshot(&self) -> HashMap<String, f64> {
        let inner = self.inner.read().await;
        inner
            .iter()
            .filter_map(|(asset, s)| s.back().map(|o| (asset.clone(), o.price)))
            .collect()
    }

    /// Last `limit` observations for one asset, oldest → newest.
    pub async fn history(&self, asset: &str, limit: usize) -> Vec<PriceObservation> {
        let inner = self.inner.read().await;
        match inner.get(asset) {
            Some(series) => {
                let skip = series.len().saturating_sub(limit);
                series.iter().skip(skip).cloned().collect()
            }
            None => Vec::new(),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_latest_is_newest_per_asset() {
        let store = PriceStore::new(100);
        store.record("bitcoin", 50_000.0).await;
        store.record("bitcoin", 51_000.0).await;
        store.record("ethereum", 3_000.0).await;

        assert_eq!(store.latest("bitcoin").await.unwrap().price, 51_000.0);
        assert_eq!(store.latest("ethereum").await.unwrap().price, 3_000.0);
        assert!(store.latest("dogecoin").await.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_has_one_entry_per_asset() {
        let store = PriceStore::new(100);
        store.record("bitcoin", 50_000.0).await;
        store.record("bitcoin", 52_000.0).await;
        store.record("cardano", 0.45).await;

        let snapshot = store.latest_snapshot().await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["bitcoin"], 52_000.0);
        assert_eq!(snapshot["cardano"], 0.45);
    }

    #[tokio::test]
    async fn test_history_oldest_to_newest() {
        let store = PriceStore::new(100);
        for p in [1.0, 2.0, 3.0, 4.0, 5.0] {
            store.record("solana", p).await;
        }

        let last3: Vec<f64> = store
            .history("solana", 3)
            .await
            .iter()
            .map(|o| o.price)
            .collect();
        assert_eq!(last3, vec![3.0, 4.0, 5.0]);

        // limit larger than the series returns everything
        assert_eq!(store.history("solana", 50).await.len(), 5);
        assert!(store.history("unknown", 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_ring_cap_drops_oldest() {
        let store = PriceStore::new(3);
        for p in [1.0, 2.0, 3.0, 4.0] {
            store.record("bitcoin", p).await;
        }

        let all: Vec<f64> = store
            .history("bitcoin", 10)
            .await
            .iter()
            .map(|o| o.price)
            .collect();
        assert_eq!(all, vec![2.0, 3.0, 4.0]);
        assert_eq!(store.latest("bitcoin").await.unwrap().price, 4.0);
    }
}
