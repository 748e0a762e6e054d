//! Money amount with two-decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are held as signed minor units (cents) and exposed as
//! `rust_decimal::Decimal` at the edges.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits carried by every amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Errors produced when converting a decimal into an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// More than two fractional digits.
    #[error("amount {0} has more than two decimal places")]
    TooPrecise(Decimal),

    /// Does not fit into 64-bit minor units.
    #[error("amount {0} is out of range")]
    OutOfRange(Decimal),
}

/// A signed monetary amount. Positive is income, negative is expense.
///
/// Serializes as a decimal string with two fractional digits (`"150.00"`)
/// and deserializes from either a JSON number or string.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount {
    cents: i64,
}

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self { cents: 0 };

    /// Creates an amount from a decimal value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value has more than two decimal places
    /// or does not fit into 64-bit cents.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.normalize().scale() > AMOUNT_SCALE {
            return Err(AmountError::TooPrecise(value));
        }

        value
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.to_i64())
            .map(Self::from_cents)
            .ok_or(AmountError::OutOfRange(value))
    }

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.cents
    }

    /// Returns the amount as a decimal with two fractional digits.
    #[must_use]
    pub fn value(self) -> Decimal {
        Decimal::new(self.cents, AMOUNT_SCALE)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.cents == 0
    }

    /// Returns true if the amount is an expense.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.cents < 0
    }

    /// Absolute value, saturating at `i64::MAX` cents.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self {
            cents: self.cents.saturating_abs(),
        }
    }

    /// Checked addition.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.cents.checked_add(other.cents) {
            Some(cents) => Some(Self { cents }),
            None => None,
        }
    }

    /// Checked subtraction.
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.cents.checked_sub(other.cents) {
            Some(cents) => Some(Self { cents }),
            None => None,
        }
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}
