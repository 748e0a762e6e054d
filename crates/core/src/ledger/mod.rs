//! Account balance consistency.
//!
//! Every account's stored balance equals the sum of the amounts of the
//! transactions linked to it. Transaction mutations are turned into a
//! [`BalancePlan`] here; the persistence layer applies the plan in the same
//! database transaction as the row write.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{BalanceAdjustment, BalancePlan, Posting};
