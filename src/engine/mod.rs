//! Engine components driven by the scheduler loop: the pure alert evaluator
//! and the two external collaborators (price feed, notification transport).

pub mod evaluator;
pub mod fetcher;
pub mod notifier;
