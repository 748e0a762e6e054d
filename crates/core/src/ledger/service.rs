//! Balance planning for transaction create, update and delete.

use fintrack_shared::types::{AccountId, Amount};

use super::error::LedgerError;
use super::types::{BalancePlan, Posting};

/// Ledger service for business logic.
pub struct LedgerService;

impl LedgerService {
    /// Balance writes for a newly created transaction.
    #[must_use]
    pub fn plan_create(new: &Posting) -> BalancePlan {
        let mut plan = BalancePlan::empty();
        if let Some(account_id) = new.account_id {
            plan.push(account_id, new.amount);
        }
        plan
    }

    /// Balance writes for replacing `old` with `new`.
    ///
    /// - same account: one write of `new - old`
    /// - account changed: `-old` on the old account, `+new` on the new one
    /// - no account on either side: nothing
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Overflow` if a delta does not fit into 64-bit cents.
    pub fn plan_update(old: &Posting, new: &Posting) -> Result<BalancePlan, LedgerError> {
        let mut plan = BalancePlan::empty();

        match (old.account_id, new.account_id) {
            (Some(before), Some(after)) if before == after => {
                let delta = new
                    .amount
                    .checked_sub(old.amount)
                    .ok_or(LedgerError::Overflow(after))?;
                plan.push(after, delta);
            }
            (before, after) => {
                if let Some(account_id) = before {
                    plan.push(account_id, reversal(account_id, old.amount)?);
                }
                if let Some(account_id) = after {
                    plan.push(account_id, new.amount);
                }
            }
        }

        Ok(plan)
    }

    /// Balance writes for deleting a transaction.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Overflow` if the amount cannot be negated.
    pub fn plan_delete(old: &Posting) -> Result<BalancePlan, LedgerError> {
        let mut plan = BalancePlan::empty();
        if let Some(account_id) = old.account_id {
            plan.push(account_id, reversal(account_id, old.amount)?);
        }
        Ok(plan)
    }
}

fn reversal(account_id: AccountId, amount: Amount) -> Result<Amount, LedgerError> {
    Amount::ZERO
        .checked_sub(amount)
        .ok_or(LedgerError::Overflow(account_id))
}
