//! # models::price
//!
//! One observed price point from the external feed.  Immutable once written —
//! the price store only ever appends these.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single (asset, price, time) sample from the poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Asset identifier, e.g. `"bitcoin"`
    pub asset: String,
    /// Quoted price in USD
    pub price: f64,
    /// UTC timestamp at which the poll cycle recorded this sample
    pub observed_at: DateTime<Utc>,
}

impl PriceObservation {
    pub fn new(asset: &str, price: f64) -> Self {
        Self {
            asset: asset.to_string(),
            price,
            observed_at: Utc::now(),
        }
    }
}
