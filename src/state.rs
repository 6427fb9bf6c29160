//! # state
//!
//! Top-level shared state injected into every Axum handler.
//!
//! The three aggregates (price store, ledger, alert registry) are long-lived
//! service objects constructed once at process start — the scheduler loop and
//! the request layer both hold `Arc` handles to the same instances.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use crate::alerts::AlertRegistry;
use crate::config::Config;
use crate::ledger::Ledger;
use crate::prices::PriceStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Append-only price history, written by the poll cycle
    pub prices: Arc<PriceStore>,

    /// Cash balance + holdings + transaction log (single writer)
    pub ledger: Arc<Ledger>,

    /// Alert definitions, read by the alert cycle
    pub alerts: Arc<AlertRegistry>,

    /// reqwest Client shared across the whole system (thread-safe,
    /// connection pooling) — created once, never per request
    pub http_client: reqwest::Client,

    // ── Metrics (health endpoint) ─────────────────────────────────────────────
    pub poll_count: Arc<AtomicU64>,
    pub alerts_fired: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            prices: Arc::new(PriceStore::new(config.price_history_cap)),
            ledger: Arc::new(Ledger::new(config.starting_balance)),
            alerts: Arc::new(AlertRegistry::new()),
            http_client: reqwest::Client::new(),
            poll_count: Arc::new(AtomicU64::new(0)),
            alerts_fired: Arc::new(AtomicU64::new(0)),
            config: Arc::new(config),
        }
    }
}

/// Convenience type alias
pub type SharedState = Arc<AppState>;

pub fn build_state(config: Config) -> SharedState {
    Arc::new(AppState::new(config))
}
