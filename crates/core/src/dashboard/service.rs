//! Dashboard aggregation.

use fintrack_shared::types::Amount;
use rust_decimal::Decimal;

use super::types::PeriodSummary;

/// Dashboard service for business logic.
pub struct DashboardService;

impl DashboardService {
    /// Folds transaction amounts into income, expense and balance totals.
    #[must_use]
    pub fn summarize<I>(amounts: I) -> PeriodSummary
    where
        I: IntoIterator<Item = Amount>,
    {
        let mut summary = amounts
            .into_iter()
            .fold(PeriodSummary::default(), |mut acc, amount| {
                if amount.is_negative() {
                    acc.total_expenses += amount.abs().value();
                } else {
                    acc.total_income += amount.value();
                }
                acc.transaction_count += 1;
                acc
            });

        summary.balance = summary.total_income - summary.total_expenses;
        summary
    }

    /// Sum of account balances.
    #[must_use]
    pub fn total_balance<I>(balances: I) -> Decimal
    where
        I: IntoIterator<Item = Amount>,
    {
        balances.into_iter().map(Amount::value).sum()
    }
}
