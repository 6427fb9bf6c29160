//! # config — runtime configuration from environment variables
//!
//! Every knob has a sensible default so `cargo run` works with an empty
//! environment.  `.env` is loaded by `main` via dotenvy before this runs.

use std::time::Duration;

/// Everything the server and the scheduler loop need, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind address, e.g. `0.0.0.0:3000`
    pub bind_addr: String,
    /// Period of the scheduler loop (poll + alert cycle)
    pub poll_interval: Duration,
    /// Asset ids polled every tick, e.g. `bitcoin`, `ethereum`
    pub tracked_assets: Vec<String>,
    /// Synthetic cash the ledger starts with (paper money)
    pub starting_balance: f64,
    /// Base URL of the price API. `"mock"` = canned prices for dev/test
    pub price_api_url: String,
    /// Max observations kept per asset in the price store
    pub price_history_cap: usize,
    /// Optional webhook the notifier POSTs triggered alerts to.
    /// None = log-only delivery (dev mode)
    pub notify_webhook_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            poll_interval: Duration::from_secs(env_u64("POLL_INTERVAL_SECS", 60)),
            tracked_assets: std::env::var("TRACKED_ASSETS")
                .unwrap_or_else(|_| "bitcoin,ethereum,cardano,dogecoin,solana".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            starting_balance: env_f64("STARTING_BALANCE", 10_000.0),
            price_api_url: std::env::var("PRICE_API_URL")
                .unwrap_or_else(|_| "https://api.coingecko.com/api/v3".to_string()),
            price_history_cap: env_usize("PRICE_HISTORY_CAP", 1000),
            notify_webhook_url: std::env::var("NOTIFY_WEBHOOK_URL").ok(),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
