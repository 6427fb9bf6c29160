//! Domain models shared across the entire Coinfolio system.

pub mod alert;
pub mod ledger;
pub mod price;

pub use alert::{Alert, AlertDirection};
pub use ledger::{
    BuyReceipt, Holding, HoldingValuation, PortfolioValuation, SellReceipt, Transaction, TxKind,
};
pub use price::PriceObservation;
