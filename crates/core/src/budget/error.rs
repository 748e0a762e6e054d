//! Budget error types.

use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Criteria string is not `monthly` or `annual`.
    #[error("unknown budget criteria: {0}")]
    UnknownCriteria(String),
}
