//! # routes::trading
//!
//! Axum route handlers for the paper-trading ledger.
//!
//! ## Endpoints
//!
//! | Method | Path                      | Description                          |
//! |--------|---------------------------|--------------------------------------|
//! | POST   | `/api/trade/buy`          | Buy an asset with paper cash         |
//! | POST   | `/api/trade/sell`         | Sell a held asset                    |
//! | GET    | `/api/trade/balance`      | Current cash balance                 |
//! | GET    | `/api/trade/portfolio`    | Holdings with amount > 0             |
//! | GET    | `/api/trade/valuation`    | Mark-to-market against latest prices |
//! | GET    | `/api/trade/transactions` | Recent transactions, newest first    |

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, state::SharedState};

/// Default for `/api/trade/transactions?limit=`
const DEFAULT_TX_LIMIT: usize = 20;

// ─── POST /api/trade/buy ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TradeRequest {
    pub asset: String,
    pub amount: f64,
    pub price: f64,
}

pub async fn buy(
    State(state): State<SharedState>,
    Json(req): Json<TradeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = state.ledger.buy(&req.asset, req.amount, req.price).await?;

    Ok(Json(json!({
        "ok":          true,
        "message":     format!("Bought {} {} at ${}", req.amount, req.asset, req.price),
        "new_balance": receipt.new_balance,
        "total_cost":  receipt.total_cost,
    })))
}

// ─── POST /api/trade/sell ─────────────────────────────────────────────────────

pub async fn sell(
    State(state): State<SharedState>,
    Json(req): Json<TradeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = state.ledger.sell(&req.asset, req.amount, req.price).await?;

    Ok(Json(json!({
        "ok":          true,
        "message":     format!("Sold {} {} at ${}", req.amount, req.asset, req.price),
        "new_balance": receipt.new_balance,
        "total_value": receipt.total_value,
        "profit_loss": receipt.profit_loss,
    })))
}

// ─── GET /api/trade/balance ───────────────────────────────────────────────────

pub async fn get_balance(State(state): State<SharedState>) -> impl IntoResponse {
    Json(json!({
        "ok":      true,
        "balance": state.ledger.balance().await,
    }))
}

// ─── GET /api/trade/portfolio ─────────────────────────────────────────────────

pub async fn get_portfolio(State(state): State<SharedState>) -> impl IntoResponse {
    let holdings = state.ledger.portfolio().await;
    Json(json!({
        "ok":       true,
        "count":    holdings.len(),
        "holdings": holdings,
    }))
}

// ─── GET /api/trade/valuation ─────────────────────────────────────────────────

/// Mark-to-market against the latest polled prices.  Net worth = cash + value
/// is computed here, on top of the ledger's valuation.
pub async fn get_valuation(State(state): State<SharedState>) -> impl IntoResponse {
    let snapshot = state.prices.latest_snapshot().await;
    let valuation = state.ledger.valuation(&snapshot).await;
    let balance = state.ledger.balance().await;

    Json(json!({
        "ok":          true,
        "balance":     balance,
        "total_value": valuation.total_value,
        "net_worth":   balance + valuation.total_value,
        "holdings":    valuation.holdings,
    }))
}

// ─── GET /api/trade/transactions ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TxQuery {
    pub limit: Option<usize>,
}

pub async fn get_transactions(
    State(state): State<SharedState>,
    Query(query): Query<TxQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(DEFAULT_TX_LIMIT);
    let transactions = state.ledger.transactions(limit).await;

    Json(json!({
        "ok":           true,
        "count":        transactions.len(),
        "transactions": transactions,
    }))
}
