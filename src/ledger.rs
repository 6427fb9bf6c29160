//! # ledger — paper-trading bookkeeping engine
//!
//! Owns the cash balance, all holdings and the append-only transaction log.
//! Single writer: nothing outside this module mutates any of the three.
//!
//! ## Load-bearing accounting rules
//! - **Buy** recomputes `avg_cost` as a quantity-weighted average.
//! - **Sell** never touches `avg_cost` — cost basis only changes on Buy.
//! - A holding sold down to exactly zero is **removed**, not kept at 0.
//! - A rejected Buy/Sell mutates nothing at all.
//!
//! One `RwLock` guards the whole ledger, so a Buy/Sell is a single atomic
//! read-modify-write: holding update, log append and balance change become
//! visible together or not at all.  Throughput is not a concern at tens of
//! operations per minute.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::info;

use crate::error::AppError;
use crate::models::{
    BuyReceipt, Holding, HoldingValuation, PortfolioValuation, SellReceipt, Transaction, TxKind,
};

// ─── Internal State ───────────────────────────────────────────────────────────

#[derive(Debug)]
struct LedgerInner {
    /// Cash available, in USD.  Never negative.
    balance: f64,
    /// Holdings keyed by asset.  No zero-amount entries.
    holdings: HashMap<String, Holding>,
    /// Append-only, ordered by `occurred_at` (push order)
    transactions: Vec<Transaction>,
}

// ─── Ledger ───────────────────────────────────────────────────────────────────

pub struct Ledger {
    inner: RwLock<LedgerInner>,
}

impl Ledger {
    pub fn new(starting_balance: f64) -> Self {
        Self {
            inner: RwLock::new(LedgerInner {
                balance: starting_balance,
                holdings: HashMap::new(),
                transactions: Vec::new(),
            }),
        }
    }

    /// Current cash balance.  No side effect.
    pub async fn balance(&self) -> f64 {
        self.inner.read().await.balance
    }

    // ─── Buy ──────────────────────────────────────────────────────────────────

    /// Buy `amount` units of `asset` at `unit_price`.
    ///
    /// Fails with `InsufficientFunds` when the total cost exceeds the balance;
    /// nothing is mutated on any failure path.
    pub async fn buy(
        &self,
        asset: &str,
        amount: f64,
        unit_price: f64,
    ) -> Result<BuyReceipt, AppError> {
        validate_order(amount, unit_price)?;
        let total_cost = amount * unit_price;

        let mut inner = self.inner.write().await;

        if total_cost > inner.balance {
            return Err(AppError::InsufficientFunds(format!(
                "Buy requires ${total_cost:.2} but balance is ${:.2}",
                inner.balance
            )));
        }

        // Weighted average against the existing position, or a fresh holding.
        inner
            .holdings
            .entry(asset.to_string())
            .and_modify(|holding| {
                let new_amount = holding.amount + amount;
                holding.avg_cost =
                    (holding.amount * holding.avg_cost + amount * unit_price) / new_amount;
                holding.amount = new_amount;
            })
            .or_insert_with(|| Holding {
                asset: asset.to_string(),
                amount,
                avg_cost: unit_price,
            });

        inner
            .transactions
            .push(Transaction::new(TxKind::Buy, asset, amount, unit_price));
        inner.balance -= total_cost;
        let new_balance = inner.balance;

        info!(
            asset,
            amount,
            unit_price,
            total_cost,
            new_balance,
            "🟢 BUY executed"
        );

        Ok(BuyReceipt {
            new_balance,
            total_cost,
        })
    }

    // ─── Sell ─────────────────────────────────────────────────────────────────

    /// Sell `amount` units of `asset` at `unit_price`.
    ///
    /// Fails with `InsufficientHoldings` when the asset is not held or the
    /// held amount is smaller than `amount`; nothing is mutated on failure.
    pub async fn sell(
        &self,
        asset: &str,
        amount: f64,
        unit_price: f64,
    ) -> Result<SellReceipt, AppError> {
        validate_order(amount, unit_price)?;

        let mut inner = self.inner.write().await;

        let (old_amount, avg_cost) = match inner.holdings.get(asset) {
            Some(h) if h.amount >= amount => (h.amount, h.avg_cost),
            Some(h) => {
                return Err(AppError::InsufficientHoldings(format!(
                    "Sell of {amount} {asset} exceeds held amount {}",
                    h.amount
                )))
            }
            None => {
                return Err(AppError::InsufficientHoldings(format!(
                    "No holding for {asset}"
                )))
            }
        };

        let total_value = amount * unit_price;
        let cost_basis = amount * avg_cost;
        let profit_loss = total_value - cost_basis;

        let new_amount = old_amount - amount;
        if new_amount == 0.0 {
            // Fully closed — drop the entry rather than keep a stale avg_cost
            inner.holdings.remove(asset);
        } else {
            // avg_cost stays untouched: cost basis only changes on Buy
            if let Some(h) = inner.holdings.get_mut(asset) {
                h.amount = new_amount;
            }
        }

        inner
            .transactions
            .push(Transaction::new(TxKind::Sell, asset, amount, unit_price));
        inner.balance += total_value;
        let new_balance = inner.balance;

        info!(
            asset,
            amount,
            unit_price,
            total_value,
            profit_loss,
            new_balance,
            "🔴 SELL executed"
        );

        Ok(SellReceipt {
            new_balance,
            total_value,
            profit_loss,
        })
    }

    // ─── Reads ────────────────────────────────────────────────────────────────

    /// All current holdings (amount > 0), sorted by asset name.
    pub async fn portfolio(&self) -> Vec<Holding> {
        let inner = self.inner.read().await;
        let mut holdings: Vec<Holding> = inner.holdings.values().cloned().collect();
        holdings.sort_by(|a, b| a.asset.cmp(&b.asset));
        holdings
    }

    /// The most recent `limit` transactions, newest first.
    pub async fn transactions(&self, limit: usize) -> Vec<Transaction> {
        let inner = self.inner.read().await;
        inner
            .transactions
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Mark the portfolio to market against a latest-price snapshot.
    ///
    /// Holdings whose asset is missing from `prices` are silently excluded.
    /// Net worth (balance + total value) is the caller's business.
    pub async fn valuation(&self, prices: &HashMap<String, f64>) -> PortfolioValuation {
        let holdings = self.portfolio().await;

        let mut total_value = 0.0;
        let mut breakdown = Vec::with_capacity(holdings.len());

        for h in holdings {
            let Some(&current_price) = prices.get(&h.asset) else {
                continue;
            };

            let value = h.amount * current_price;
            let cost_basis = h.amount * h.avg_cost;
            let profit_loss = value - cost_basis;
            // Guard divide-by-zero; tiny-but-nonzero avg_cost is intentionally
            // not clamped, huge percentages and all.
            let profit_loss_pct = if h.avg_cost == 0.0 {
                0.0
            } else {
                profit_loss / cost_basis * 100.0
            };

            total_value += value;
            breakdown.push(HoldingValuation {
                asset: h.asset,
                amount: h.amount,
                avg_cost: h.avg_cost,
                current_price,
                value,
                profit_loss,
                profit_loss_pct,
            });
        }

        PortfolioValuation {
            total_value,
            holdings: breakdown,
        }
    }
}

/// Shared precondition for Buy and Sell.
fn validate_order(amount: f64, unit_price: f64) -> Result<(), AppError> {
    if !(amount > 0.0) {
        return Err(AppError::InvalidArgument(format!(
            "amount must be positive, got {amount}"
        )));
    }
    if !(unit_price > 0.0) {
        return Err(AppError::InvalidArgument(format!(
            "price must be positive, got {unit_price}"
        )));
    }
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_ledger() -> Ledger {
        Ledger::new(10_000.0)
    }

    #[tokio::test]
    async fn test_buy_creates_holding_and_debits_balance() {
        let ledger = make_ledger();
        let receipt = ledger.buy("bitcoin", 0.1, 50_000.0).await.unwrap();

        assert_eq!(receipt.total_cost, 5_000.0);
        assert_eq!(receipt.new_balance, 5_000.0);
        assert_eq!(ledger.balance().await, 5_000.0);

        let portfolio = ledger.portfolio().await;
        assert_eq!(portfolio.len(), 1);
        assert_eq!(portfolio[0].asset, "bitcoin");
        assert_eq!(portfolio[0].amount, 0.1);
        assert_eq!(portfolio[0].avg_cost, 50_000.0);
    }

    #[tokio::test]
    async fn test_buy_recomputes_weighted_average() {
        let ledger = make_ledger();
        // a1=1 @ p1=100, a2=3 @ p2=200 → avg = (100 + 600) / 4 = 175
        ledger.buy("cardano", 1.0, 100.0).await.unwrap();
        ledger.buy("cardano", 3.0, 200.0).await.unwrap();

        let portfolio = ledger.portfolio().await;
        assert_eq!(portfolio[0].amount, 4.0);
        assert!((portfolio[0].avg_cost - 175.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_buy_insufficient_funds_mutates_nothing() {
        let ledger = make_ledger();
        let err = ledger.buy("bitcoin", 1.0, 50_000.0).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientFunds(_)));

        assert_eq!(ledger.balance().await, 10_000.0);
        assert!(ledger.portfolio().await.is_empty());
        assert!(ledger.transactions(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_buy_exact_balance_is_allowed() {
        let ledger = make_ledger();
        let receipt = ledger.buy("ethereum", 4.0, 2_500.0).await.unwrap();
        assert_eq!(receipt.new_balance, 0.0);
    }

    #[tokio::test]
    async fn test_sell_profit_loss_and_balance() {
        // buy 0.1 BTC @ 50k, sell 0.05 @ 60k
        let ledger = make_ledger();
        ledger.buy("bitcoin", 0.1, 50_000.0).await.unwrap();

        let receipt = ledger.sell("bitcoin", 0.05, 60_000.0).await.unwrap();
        assert_eq!(receipt.total_value, 3_000.0);
        assert!((receipt.profit_loss - 500.0).abs() < 1e-9); // 3000 - 2500
        assert_eq!(receipt.new_balance, 8_000.0);

        let portfolio = ledger.portfolio().await;
        assert!((portfolio[0].amount - 0.05).abs() < 1e-12);
        assert_eq!(portfolio[0].avg_cost, 50_000.0); // untouched by the sell
    }

    #[tokio::test]
    async fn test_sell_entire_holding_removes_it() {
        let ledger = make_ledger();
        ledger.buy("dogecoin", 100.0, 0.5).await.unwrap();
        ledger.sell("dogecoin", 100.0, 0.6).await.unwrap();

        assert!(ledger.portfolio().await.is_empty());
        // Selling again must fail — the holding is gone, not zeroed
        let err = ledger.sell("dogecoin", 1.0, 0.6).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientHoldings(_)));
    }

    #[tokio::test]
    async fn test_sell_insufficient_holdings_mutates_nothing() {
        let ledger = make_ledger();
        ledger.buy("solana", 2.0, 100.0).await.unwrap();

        let err = ledger.sell("solana", 5.0, 100.0).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientHoldings(_)));

        let portfolio = ledger.portfolio().await;
        assert_eq!(portfolio[0].amount, 2.0);
        assert_eq!(ledger.balance().await, 9_800.0);
        assert_eq!(ledger.transactions(10).await.len(), 1); // only the buy
    }

    #[tokio::test]
    async fn test_sell_then_buy_at_avg_cost_restores_position() {
        let ledger = make_ledger();
        ledger.buy("ethereum", 1.0, 100.0).await.unwrap();
        ledger.buy("ethereum", 1.0, 200.0).await.unwrap();
        // avg = 150, amount = 2

        ledger.sell("ethereum", 1.0, 150.0).await.unwrap();
        ledger.buy("ethereum", 1.0, 150.0).await.unwrap();

        let portfolio = ledger.portfolio().await;
        assert_eq!(portfolio[0].amount, 2.0);
        assert!((portfolio[0].avg_cost - 150.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_invalid_arguments_rejected() {
        let ledger = make_ledger();
        assert!(matches!(
            ledger.buy("bitcoin", 0.0, 100.0).await.unwrap_err(),
            AppError::InvalidArgument(_)
        ));
        assert!(matches!(
            ledger.buy("bitcoin", 1.0, -5.0).await.unwrap_err(),
            AppError::InvalidArgument(_)
        ));
        assert!(matches!(
            ledger.sell("bitcoin", -1.0, 100.0).await.unwrap_err(),
            AppError::InvalidArgument(_)
        ));
        assert_eq!(ledger.balance().await, 10_000.0);
    }

    #[tokio::test]
    async fn test_transactions_newest_first_with_limit() {
        let ledger = make_ledger();
        ledger.buy("bitcoin", 0.01, 50_000.0).await.unwrap();
        ledger.buy("ethereum", 1.0, 3_000.0).await.unwrap();
        ledger.sell("bitcoin", 0.01, 55_000.0).await.unwrap();

        let txs = ledger.transactions(2).await;
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].kind, TxKind::Sell);
        assert_eq!(txs[0].asset, "bitcoin");
        assert_eq!(txs[1].kind, TxKind::Buy);
        assert_eq!(txs[1].asset, "ethereum");
    }

    #[tokio::test]
    async fn test_valuation_excludes_unpriced_holdings() {
        let ledger = make_ledger();
        ledger.buy("bitcoin", 0.1, 50_000.0).await.unwrap();
        ledger.buy("cardano", 100.0, 1.0).await.unwrap();

        let prices = HashMap::from([("bitcoin".to_string(), 60_000.0)]);
        let valuation = ledger.valuation(&prices).await;

        assert_eq!(valuation.holdings.len(), 1);
        assert_eq!(valuation.holdings[0].asset, "bitcoin");
        assert!((valuation.total_value - 6_000.0).abs() < 1e-9);
        assert!((valuation.holdings[0].profit_loss - 1_000.0).abs() < 1e-9);
        assert!((valuation.holdings[0].profit_loss_pct - 20.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_valuation_empty_snapshot() {
        let ledger = make_ledger();
        ledger.buy("bitcoin", 0.1, 50_000.0).await.unwrap();

        let valuation = ledger.valuation(&HashMap::new()).await;
        assert_eq!(valuation.total_value, 0.0);
        assert!(valuation.holdings.is_empty());
    }
}
