//! Dashboard data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Income and expense totals for a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Sum of positive amounts.
    pub total_income: Decimal,
    /// Absolute sum of negative amounts.
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`.
    pub balance: Decimal,
    /// Number of transactions in the period, zero amounts included.
    pub transaction_count: u64,
}
