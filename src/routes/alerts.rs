//! # routes::alerts
//!
//! Axum route handlers for the alert registry.
//!
//! ## Endpoints
//!
//! | Method | Path              | Description                      |
//! |--------|-------------------|----------------------------------|
//! | POST   | `/api/alerts`     | Register a new active alert      |
//! | GET    | `/api/alerts`     | All alerts (active and fired)    |
//! | DELETE | `/api/alerts/:id` | Remove an alert by id            |

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{error::AppError, models::AlertDirection, state::SharedState};

// ─── POST /api/alerts ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddAlertRequest {
    /// Notification target, e.g. an email address
    pub recipient: String,
    pub asset: String,
    pub target_price: f64,
    /// `"ABOVE"` or `"BELOW"`
    pub direction: AlertDirection,
}

pub async fn add_alert(
    State(state): State<SharedState>,
    Json(req): Json<AddAlertRequest>,
) -> Result<impl IntoResponse, AppError> {
    let alert = state
        .alerts
        .add(&req.recipient, &req.asset, req.target_price, req.direction)
        .await?;

    Ok(Json(json!({
        "ok":    true,
        "alert": alert,
    })))
}

// ─── GET /api/alerts ──────────────────────────────────────────────────────────

pub async fn list_alerts(State(state): State<SharedState>) -> impl IntoResponse {
    let alerts = state.alerts.list_all().await;
    let active = alerts.iter().filter(|a| a.active).count();

    Json(json!({
        "ok":     true,
        "count":  alerts.len(),
        "active": active,
        "alerts": alerts,
    }))
}

// ─── DELETE /api/alerts/:id ───────────────────────────────────────────────────

pub async fn delete_alert(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.alerts.delete(id).await?;
    Ok(Json(json!({
        "ok": true,
        "id": id,
    })))
}
