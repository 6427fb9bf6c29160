//! # routes::prices
//!
//! Axum route handlers for the price history + health check.
//!
//! ## Endpoints
//!
//! | Method | Path                  | Description                           |
//! |--------|-----------------------|---------------------------------------|
//! | GET    | `/api/health`         | Liveness + scheduler counters         |
//! | GET    | `/api/prices`         | Latest observation per tracked asset  |
//! | GET    | `/api/history/:asset` | Recent observations, oldest → newest  |

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::Ordering;

use crate::state::SharedState;

/// Default for `/api/history/:asset?limit=`
const DEFAULT_HISTORY_LIMIT: usize = 20;

// ─── GET /api/health ──────────────────────────────────────────────────────────

pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    let poll_count = state.poll_count.load(Ordering::Relaxed);
    let alerts_fired = state.alerts_fired.load(Ordering::Relaxed);
    let active_alerts = state.alerts.list_active().await.len();

    Json(json!({
        "ok":            true,
        "status":        "healthy",
        "timestamp":     chrono::Utc::now(),
        "poll_count":    poll_count,
        "alerts_fired":  alerts_fired,
        "active_alerts": active_alerts,
        "tracked":       state.config.tracked_assets,
    }))
}

// ─── GET /api/prices ──────────────────────────────────────────────────────────

pub async fn get_prices(State(state): State<SharedState>) -> impl IntoResponse {
    let prices = state.prices.latest_all().await;
    Json(json!({
        "ok":    true,
        "count": prices.len(),
        "data":  prices,
    }))
}

// ─── GET /api/history/:asset ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub async fn get_history(
    State(state): State<SharedState>,
    Path(asset): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let history = state.prices.history(&asset, limit).await;

    Json(json!({
        "ok":     true,
        "asset":  asset,
        "count":  history.len(),
        "prices": history,
    }))
}
