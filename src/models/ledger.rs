//! # models::ledger
//!
//! Structs for the paper-trading ledger: holdings, the append-only
//! transaction log, and the receipt / valuation payloads returned to callers.
//!
//! ## Why separate receipts?
//! `Holding`     = current state of one owned asset (amount + cost basis)
//! `Transaction` = immutable log entry, never mutated or deleted
//! `*Receipt`    = what a Buy/Sell returns to the request layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── TxKind ───────────────────────────────────────────────────────────────────

/// Which side of the book a transaction sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxKind {
    Buy,
    Sell,
}

// ─── Transaction ──────────────────────────────────────────────────────────────

/// One entry of the append-only trade log, ordered by `occurred_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub kind: TxKind,
    pub asset: String,
    /// Units traded (always positive)
    pub amount: f64,
    /// Unit price at execution
    pub price: f64,
    /// `amount * price` — cost for a Buy, proceeds for a Sell
    pub total: f64,
    pub occurred_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(kind: TxKind, asset: &str, amount: f64, price: f64) -> Self {
        Self {
            kind,
            asset: asset.to_string(),
            amount,
            price,
            total: amount * price,
            occurred_at: Utc::now(),
        }
    }
}

// ─── Holding ──────────────────────────────────────────────────────────────────

/// Current position in one asset.
///
/// Invariant: a holding with `amount == 0` is removed from the ledger, never
/// kept around with a stale `avg_cost`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub asset: String,
    /// Units currently owned
    pub amount: f64,
    /// Quantity-weighted average acquisition price per unit.
    /// Recomputed on Buy only — a Sell never changes it.
    pub avg_cost: f64,
}

// ─── Receipts ─────────────────────────────────────────────────────────────────

/// Returned by a successful Buy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyReceipt {
    pub new_balance: f64,
    pub total_cost: f64,
}

/// Returned by a successful Sell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellReceipt {
    pub new_balance: f64,
    pub total_value: f64,
    /// `total_value - amount * avg_cost_before_sell`
    pub profit_loss: f64,
}

// ─── Valuation ────────────────────────────────────────────────────────────────

/// Mark-to-market view of one holding against a current-price snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingValuation {
    pub asset: String,
    pub amount: f64,
    pub avg_cost: f64,
    pub current_price: f64,
    /// `amount * current_price`
    pub value: f64,
    /// `value - amount * avg_cost`
    pub profit_loss: f64,
    /// Percentage against cost basis; 0 when `avg_cost == 0`
    pub profit_loss_pct: f64,
}

/// Mark-to-market view of the whole portfolio.
///
/// Holdings whose asset is missing from the price snapshot are excluded from
/// both `total_value` and `holdings` — that is not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioValuation {
    pub total_value: f64,
    pub holdings: Vec<HoldingValuation>,
}
