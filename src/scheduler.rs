//! # scheduler — the periodic poll + alert loop
//!
//! One repeating timer drives two cycles per tick:
//!
//! ```text
//! every POLL_INTERVAL_SECS:
//!   1. Poll cycle  — feed.fetch_latest(tracked) → PriceStore.record per asset
//!   2. Alert cycle — snapshot → evaluator → notify + deactivate per match
//! ```
//!
//! Collaborator failures (`Fetch`, `Notify`) are absorbed here: they are
//! logged and the loop continues — the next tick is the retry mechanism.
//! Nothing in this module can crash or pause the loop.
//!
//! Shutdown is cooperative: a `watch` flag is observed between awaits, so an
//! in-flight cycle always runs to completion before the task returns — no
//! ledger or registry mutation is ever left half-applied.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::alerts::AlertRegistry;
use crate::engine::evaluator::check_alerts;
use crate::engine::fetcher::PriceFeed;
use crate::engine::notifier::Notifier;
use crate::prices::PriceStore;

pub struct Scheduler<F, N> {
    feed: F,
    notifier: N,
    prices: Arc<PriceStore>,
    alerts: Arc<AlertRegistry>,
    /// Asset ids polled every tick
    tracked: Vec<String>,
    period: Duration,
    /// Completed poll cycles (shared with the health endpoint)
    poll_count: Arc<AtomicU64>,
    /// Alerts fired over the process lifetime
    alerts_fired: Arc<AtomicU64>,
}

impl<F, N> Scheduler<F, N>
where
    F: PriceFeed,
    N: Notifier,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        feed: F,
        notifier: N,
        prices: Arc<PriceStore>,
        alerts: Arc<AlertRegistry>,
        tracked: Vec<String>,
        period: Duration,
        poll_count: Arc<AtomicU64>,
        alerts_fired: Arc<AtomicU64>,
    ) -> Self {
        Self {
            feed,
            notifier,
            prices,
            alerts,
            tracked,
            period,
            poll_count,
            alerts_fired,
        }
    }

    /// Run until the shutdown flag flips to `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.period);
        // A slow cycle must not cause a burst of catch-up ticks
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            period = ?self.period,
            tracked = ?self.tracked,
            "⏱️ Scheduler loop started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_cycle().await;
                    self.alert_cycle().await;
                }
                changed = shutdown.changed() => {
                    // Err = sender dropped; treat it as shutdown too
                    if changed.is_err() || *shutdown.borrow() {
                        info!("⏹️ Scheduler loop stopping — no cycle in flight");
                        break;
                    }
                }
            }
        }
    }

    // ─── Poll Cycle ───────────────────────────────────────────────────────────

    /// Fetch latest prices for the tracked set and persist them.
    ///
    /// A fetch failure skips the whole cycle (logged, retried next tick).
    /// An asset missing from the response skips only that asset.
    pub async fn poll_cycle(&self) {
        let prices = match self.feed.fetch_latest(&self.tracked).await {
            Ok(prices) => prices,
            Err(e) => {
                error!(error = %e, "❌ Poll cycle failed — will retry next tick");
                return;
            }
        };

        for asset in &self.tracked {
            match prices.get(asset) {
                Some(&price) => {
                    self.prices.record(asset, price).await;
                }
                None => {
                    warn!(asset = %asset, "No price in feed response — skipping this asset");
                }
            }
        }

        self.poll_count.fetch_add(1, Ordering::Relaxed);
    }

    // ─── Alert Cycle ──────────────────────────────────────────────────────────

    /// Evaluate active alerts against the latest snapshot; notify and
    /// deactivate every match.
    ///
    /// Each match is processed independently — a failed notification is
    /// logged and never blocks that alert's deactivation, nor the remaining
    /// matches.
    pub async fn alert_cycle(&self) {
        let snapshot = self.prices.latest_snapshot().await;
        if snapshot.is_empty() {
            return; // nothing polled yet
        }

        let active = self.alerts.list_active().await;
        if active.is_empty() {
            return;
        }

        let triggered = check_alerts(&active, &snapshot);

        for hit in triggered {
            info!(
                id     = %hit.alert.id,
                asset  = %hit.alert.asset,
                price  = hit.price,
                target = hit.alert.target_price,
                "🚨 Alert triggered"
            );

            if let Err(e) = self.notifier.notify(&hit.alert, hit.price).await {
                error!(
                    id = %hit.alert.id,
                    error = %e,
                    "Notification failed — alert is deactivated regardless"
                );
            }

            // The active flag is the at-most-once guarantee: once cleared,
            // the evaluator never sees this alert again.
            self.alerts.deactivate(hit.alert.id).await;
            self.alerts_fired.fetch_add(1, Ordering::Relaxed);
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
