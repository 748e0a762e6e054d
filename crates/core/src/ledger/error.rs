//! Ledger error types.

use fintrack_shared::types::AccountId;
use thiserror::Error;

/// Errors that can occur while planning balance changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A balance delta does not fit into 64-bit cents.
    #[error("balance adjustment overflow for account {0}")]
    Overflow(AccountId),
}
