//! Budget domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BudgetError;

/// Window a budget is evaluated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetCriteria {
    /// Current calendar month.
    Monthly,
    /// Current calendar year.
    Annual,
}

impl BudgetCriteria {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Annual => "annual",
        }
    }
}

impl std::fmt::Display for BudgetCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BudgetCriteria {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "annual" => Ok(Self::Annual),
            other => Err(BudgetError::UnknownCriteria(other.to_string())),
        }
    }
}

/// Spend against a budget limit for the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSpend {
    /// Absolute sum of expenses in the window.
    pub spent: Decimal,
    /// `limit - spent`; negative when overspent.
    pub remaining: Decimal,
    /// `remaining / limit * 100`, or zero for a non-positive limit.
    pub percentage: Decimal,
}

/// Outcome of checking a proposed expense against a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetCheck {
    /// Whether `new_total` is above the limit.
    pub exceeded: bool,
    /// Spend so far in the window.
    pub spent: Decimal,
    /// Spend including the proposed expense.
    pub new_total: Decimal,
}
