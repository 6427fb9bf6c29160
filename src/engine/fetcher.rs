//! # engine::fetcher
//!
//! **Price Feed** — pulls latest USD prices for the tracked assets from the
//! CoinGecko simple-price API.
//!
//! ## API Contract
//! `GET {base}/simple/price?ids=bitcoin,ethereum&vs_currencies=usd` returns:
//! ```json
//! { "bitcoin": { "usd": 67000.0 }, "ethereum": { "usd": 3100.5 } }
//! ```
//! Assets CoinGecko doesn't know are simply absent from the response — the
//! poll cycle handles that per asset, it is not a fetch failure.
//!
//! Set `PRICE_API_URL=mock` to run without network access (dev/test).

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::AppError;

// ─── Trait ────────────────────────────────────────────────────────────────────

/// The scheduler's only view of the price source.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Latest price per asset.  Assets the source doesn't know may be missing
    /// from the map.  Transport or decode failure is `AppError::Fetch`.
    async fn fetch_latest(&self, assets: &[String]) -> Result<HashMap<String, f64>, AppError>;
}

// ─── CoinGecko ────────────────────────────────────────────────────────────────

/// Per-asset body of the simple-price response.
#[derive(Debug, Deserialize)]
struct VsCurrencies {
    usd: f64,
}

pub struct CoinGeckoFeed {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoFeed {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PriceFeed for CoinGeckoFeed {
    async fn fetch_latest(&self, assets: &[String]) -> Result<HashMap<String, f64>, AppError> {
        if self.base_url == "mock" {
            info!("🎭 [FEED] Running in MOCK mode — returning canned prices");
            return Ok(mock_prices(assets));
        }

        let url = format!("{}/simple/price", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ids", assets.join(",")),
                ("vs_currencies", "usd".to_string()),
            ])
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Price API unreachable");
                AppError::Fetch(format!("Price API unreachable: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(http_status = %status, body = %body, "Price API returned HTTP error");
            return Err(AppError::Fetch(format!("Price API HTTP {status}: {body}")));
        }

        let parsed: HashMap<String, VsCurrencies> = response.json().await.map_err(|e| {
            error!(error = %e, "Price API response parse failed");
            AppError::Fetch(format!("Price API parse error: {e}"))
        })?;

        Ok(parsed.into_iter().map(|(k, v)| (k, v.usd)).collect())
    }
}

/// Deterministic prices for dev mode — stable per asset so alert thresholds
/// behave predictably across ticks.
fn mock_prices(assets: &[String]) -> HashMap<String, f64> {
    assets
        .iter()
        .map(|asset| {
            let price = match asset.as_str() {
                "bitcoin" => 67_000.0,
                "ethereum" => 3_100.0,
                "cardano" => 0.45,
                "dogecoin" => 0.12,
                "solana" => 145.0,
                other => 1.0 + other.len() as f64,
            };
            (asset.clone(), price)
        })
        .collect()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_mode_covers_every_requested_asset() {
        let feed = CoinGeckoFeed::new(reqwest::Client::new(), "mock");
        let assets = vec!["bitcoin".to_string(), "obscurecoin".to_string()];

        let prices = feed.fetch_latest(&assets).await.unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices["bitcoin"], 67_000.0);
        assert!(prices["obscurecoin"] > 0.0);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        // Reserved TEST-NET-1 address — nothing listens there
        let feed = CoinGeckoFeed::new(reqwest::Client::new(), "http://192.0.2.1:1");
        let err = feed
            .fetch_latest(&["bitcoin".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Fetch(_)));
    }
}
