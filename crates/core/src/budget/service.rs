//! Budget service for spend evaluation and limit checks.

use chrono::{DateTime, Utc};
use fintrack_shared::types::Amount;
use rust_decimal::Decimal;

use super::types::{BudgetCheck, BudgetCriteria, BudgetSpend};
use crate::period::PeriodWindow;

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Window the budget is evaluated over at `now`.
    #[must_use]
    pub fn window(criteria: BudgetCriteria, now: DateTime<Utc>) -> PeriodWindow {
        match criteria {
            BudgetCriteria::Monthly => PeriodWindow::current_month(now),
            BudgetCriteria::Annual => PeriodWindow::current_year(now),
        }
    }

    /// Absolute sum of the expenses among `amounts`. Income is ignored.
    #[must_use]
    pub fn spent<I>(amounts: I) -> Decimal
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .filter(|amount| amount.is_negative())
            .map(|amount| amount.abs().value())
            .sum()
    }

    /// Spent, remaining and percentage remaining for a budget limit.
    #[must_use]
    pub fn evaluate(limit: Amount, spent: Decimal) -> BudgetSpend {
        let limit = limit.value();
        let remaining = limit - spent;

        let percentage = if limit > Decimal::ZERO {
            remaining
                .checked_div(limit)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map_or(Decimal::ZERO, |p| p.round_dp(2))
        } else {
            Decimal::ZERO
        };

        BudgetSpend {
            spent,
            remaining,
            percentage,
        }
    }

    /// Checks a proposed transaction against a budget limit.
    ///
    /// Returns `None` for income or zero amounts, which can never exceed a budget.
    #[must_use]
    pub fn check(limit: Amount, spent: Decimal, proposed: Amount) -> Option<BudgetCheck> {
        if !proposed.is_negative() {
            return None;
        }

        let new_total = spent + proposed.abs().value();
        Some(BudgetCheck {
            exceeded: new_total > limit.value(),
            spent,
            new_total,
        })
    }
}
