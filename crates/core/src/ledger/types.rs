//! Ledger domain types.

use fintrack_shared::types::{AccountId, Amount};
use serde::{Deserialize, Serialize};

/// The balance-relevant part of a transaction: its amount and the account it hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Linked account, if any.
    pub account_id: Option<AccountId>,
    /// Signed amount. Positive is income.
    pub amount: Amount,
}

impl Posting {
    /// Creates a posting.
    #[must_use]
    pub const fn new(account_id: Option<AccountId>, amount: Amount) -> Self {
        Self { account_id, amount }
    }
}

/// A single `balance = balance + delta` write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAdjustment {
    /// Account to adjust.
    pub account_id: AccountId,
    /// Signed delta to add to the balance.
    pub delta: Amount,
}

/// The set of balance writes that accompany one transaction mutation.
///
/// Zero deltas are never included, so an empty plan means no balance write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalancePlan {
    adjustments: Vec<BalanceAdjustment>,
}

impl BalancePlan {
    /// A plan that touches no account.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            adjustments: Vec::new(),
        }
    }

    /// Adds a delta, dropping it when zero.
    pub(crate) fn push(&mut self, account_id: AccountId, delta: Amount) {
        if !delta.is_zero() {
            self.adjustments.push(BalanceAdjustment { account_id, delta });
        }
    }

    /// The adjustments to apply, in order.
    #[must_use]
    pub fn adjustments(&self) -> &[BalanceAdjustment] {
        &self.adjustments
    }

    /// Returns true if no balance write is needed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjustments.is_empty()
    }
}
