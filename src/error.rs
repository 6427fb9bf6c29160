//! # error
//!
//! Centralised application error type.
//!
//! Every handler returns `Result<_, AppError>`.  Axum's `IntoResponse` impl
//! converts these into structured JSON error bodies so the frontend always
//! gets a machine-readable response even on failure.
//!
//! `Fetch` and `Notify` exist for the scheduler's collaborators (price feed,
//! notification transport).  The scheduler absorbs them — they never reach an
//! HTTP caller from the periodic loop, only from direct collaborator probes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Non-positive amount / price, unknown direction string, etc.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A buy's total cost exceeds the current cash balance.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// A sell exceeds the held amount, or the asset is not held at all.
    #[error("Insufficient holdings: {0}")]
    InsufficientHoldings(String),

    /// The requested resource (e.g. an alert id) does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The external price source was unreachable or returned garbage.
    #[error("Price fetch error: {0}")]
    Fetch(String),

    /// The notification transport failed to deliver.
    #[error("Notification error: {0}")]
    Notify(String),

    /// Catch-all for unexpected failures.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InsufficientFunds(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InsufficientHoldings(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Fetch(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Notify(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {err}"),
            ),
        };

        let body = Json(json!({
            "ok":    false,
            "error": message,
        }));

        (status, body).into_response()
    }
}
