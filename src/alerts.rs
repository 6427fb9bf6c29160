//! # alerts — price alert registry
//!
//! Owns the set of [`Alert`] definitions.  Alerts live in a `Vec` so that
//! `list_active` preserves insertion order — the evaluator fires matches in
//! the order users created them.
//!
//! Deactivation is a one-way door: it stamps `last_triggered_at` and clears
//! `active`, and nothing here ever sets `active` back to true.

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Alert, AlertDirection};

pub struct AlertRegistry {
    inner: RwLock<Vec<Alert>>,
}

impl AlertRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }

    /// Register a new active alert and return it (the id is freshly assigned).
    pub async fn add(
        &self,
        recipient: &str,
        asset: &str,
        target_price: f64,
        direction: AlertDirection,
    ) -> Result<Alert, AppError> {
        if !(target_price > 0.0) {
            return Err(AppError::InvalidArgument(format!(
                "target price must be positive, got {target_price}"
            )));
        }

        let alert = Alert::new(recipient, asset, target_price, direction);
        info!(
            id = %alert.id,
            asset,
            target_price,
            direction = ?direction,
            "🔔 Alert registered"
        );

        let mut inner = self.inner.write().await;
        inner.push(alert.clone());
        Ok(alert)
    }

    /// All alerts that have not fired yet, in insertion order.
    pub async fn list_active(&self) -> Vec<Alert> {
        let inner = self.inner.read().await;
        inner.iter().filter(|a| a.active).cloned().collect()
    }

    /// Every alert ever registered (minus deleted ones), in insertion order.
    pub async fn list_all(&self) -> Vec<Alert> {
        self.inner.read().await.clone()
    }

    /// Mark an alert as fired.  Idempotent: deactivating an inactive or
    /// unknown id is a no-op.
    pub async fn deactivate(&self, id: Uuid) {
        let mut inner = self.inner.write().await;
        if let Some(alert) = inner.iter_mut().find(|a| a.id == id) {
            if alert.active {
                alert.active = false;
                alert.last_triggered_at = Some(chrono::Utc::now());
                info!(id = %id, asset = %alert.asset, "🔕 Alert deactivated");
            }
        }
    }

    /// Remove an alert regardless of its active state.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let before = inner.len();
        inner.retain(|a| a.id != id);

        if inner.len() == before {
            return Err(AppError::NotFound(format!("No alert with id {id}")));
        }
        info!(id = %id, "🗑️ Alert deleted");
        Ok(())
    }
}

impl Default for AlertRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_and_list_active_in_insertion_order() {
        let registry = AlertRegistry::new();
        let a = registry
            .add("a@example.com", "bitcoin", 70_000.0, AlertDirection::Above)
            .await
            .unwrap();
        let b = registry
            .add("b@example.com", "ethereum", 2_500.0, AlertDirection::Below)
            .await
            .unwrap();

        let active = registry.list_active().await;
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].id, a.id);
        assert_eq!(active[1].id, b.id);
        assert!(active.iter().all(|al| al.active));
    }

    #[tokio::test]
    async fn test_non_positive_target_rejected() {
        let registry = AlertRegistry::new();
        let err = registry
            .add("a@example.com", "bitcoin", 0.0, AlertDirection::Above)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert!(registry.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_deactivate_is_one_way_and_idempotent() {
        let registry = AlertRegistry::new();
        let alert = registry
            .add("a@example.com", "bitcoin", 70_000.0, AlertDirection::Above)
            .await
            .unwrap();

        registry.deactivate(alert.id).await;
        assert!(registry.list_active().await.is_empty());

        let stored = &registry.list_all().await[0];
        assert!(!stored.active);
        let first_trigger = stored.last_triggered_at.unwrap();

        // Second deactivation changes nothing, including the trigger stamp
        registry.deactivate(alert.id).await;
        let stored = &registry.list_all().await[0];
        assert_eq!(stored.last_triggered_at.unwrap(), first_trigger);

        // Unknown id is a no-op too
        registry.deactivate(Uuid::new_v4()).await;
    }

    #[tokio::test]
    async fn test_delete_any_state_and_not_found() {
        let registry = AlertRegistry::new();
        let alert = registry
            .add("a@example.com", "solana", 150.0, AlertDirection::Below)
            .await
            .unwrap();
        registry.deactivate(alert.id).await;

        // Inactive alerts are still deletable
        registry.delete(alert.id).await.unwrap();
        assert!(registry.list_all().await.is_empty());

        let err = registry.delete(alert.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
