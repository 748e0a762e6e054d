//! Budget spend evaluation.
//!
//! A budget caps expenses in one category over the current calendar month
//! or year. Spend is the absolute sum of negative transactions in that
//! window; income never counts.

pub mod error;
pub mod service;
pub mod types;


pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{BudgetCheck, BudgetCriteria, BudgetSpend};
