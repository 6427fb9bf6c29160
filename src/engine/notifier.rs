//! # engine::notifier
//!
//! **Notifier** — delivers a triggered alert to its recipient.
//!
//! ## Mode
//! - `NOTIFY_WEBHOOK_URL` unset → the rendered email is written to the log
//!   (dev mode, matches what a local SMTP relay would send)
//! - `NOTIFY_WEBHOOK_URL` set → additionally POSTs a JSON payload to the
//!   webhook; transport failure is `AppError::Notify`
//!
//! Delivery is fire-and-forget from the scheduler's point of view: a failed
//! notification is logged and the alert is deactivated anyway.

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

use crate::error::AppError;
use crate::models::{Alert, AlertDirection};

// ─── Trait ────────────────────────────────────────────────────────────────────

/// The scheduler's only view of the notification transport.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, alert: &Alert, triggering_price: f64) -> Result<(), AppError>;
}

// ─── Email-style Notifier ─────────────────────────────────────────────────────

pub struct EmailNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl EmailNotifier {
    pub fn new(client: reqwest::Client, webhook_url: Option<String>) -> Self {
        Self {
            client,
            webhook_url,
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, alert: &Alert, triggering_price: f64) -> Result<(), AppError> {
        let condition = match alert.direction {
            AlertDirection::Above => "above",
            AlertDirection::Below => "below",
        };

        info!(
            recipient = %alert.recipient,
            asset     = %alert.asset,
            price     = triggering_price,
            target    = alert.target_price,
            condition,
            "📧 Alert notification\n\
             Subject: 🚀 Crypto Alert: {} {} ${}\n\
             Your alert for {} has been triggered!\n\
             Current price: ${}\n\
             Target price:  ${}\n\
             Condition: price is {} target",
            alert.asset,
            condition,
            alert.target_price,
            alert.asset,
            triggering_price,
            alert.target_price,
            condition,
        );

        let Some(url) = &self.webhook_url else {
            return Ok(()); // log-only delivery
        };

        let payload = json!({
            "recipient":     alert.recipient,
            "asset":         alert.asset,
            "current_price": triggering_price,
            "target_price":  alert.target_price,
            "condition":     condition,
            "alert_id":      alert.id,
        });

        let response = self
            .client
            .post(url)
            .json(&payload)
            .timeout(std::time::Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Notification webhook unreachable");
                AppError::Notify(format!("Webhook unreachable: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            error!(http_status = %status, "Notification webhook rejected the alert");
            return Err(AppError::Notify(format!("Webhook HTTP {status}")));
        }

        Ok(())
    }
}
