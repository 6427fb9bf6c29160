//! # models::alert
//!
//! Defines [`Alert`] — a one-shot price threshold watch.
//!
//! Lifecycle: created active → fires at most once → inactive forever.
//! An alert never reactivates; it can only be deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── AlertDirection ───────────────────────────────────────────────────────────

/// Which side of the target price triggers the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertDirection {
    /// Fires when observed price >= target
    Above,
    /// Fires when observed price <= target
    Below,
}

// ─── Alert ────────────────────────────────────────────────────────────────────

/// A user-defined price watch, held in the registry in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    /// Where the notification goes, e.g. an email address
    pub recipient: String,
    pub asset: String,
    pub target_price: f64,
    pub direction: AlertDirection,
    /// `true` until the alert fires once; never flips back
    pub active: bool,
    pub created_at: DateTime<Utc>,
    /// Set when the alert fires (at the moment of deactivation)
    pub last_triggered_at: Option<DateTime<Utc>>,
}

impl Alert {
    pub fn new(recipient: &str, asset: &str, target_price: f64, direction: AlertDirection) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient: recipient.to_string(),
            asset: asset.to_string(),
            target_price,
            direction,
            active: true,
            created_at: Utc::now(),
            last_triggered_at: None,
        }
    }
}
