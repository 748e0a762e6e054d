//! Dashboard statistics.

use chrono::{DateTime, Utc};
use fintrack_core::{
    dashboard::{DashboardService, PeriodSummary},
    period::PeriodWindow,
};
use fintrack_shared::{
    AppError,
    types::{Amount, UserId},
};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{accounts, transactions};

/// Error types for dashboard queries.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DashboardError> for AppError {
    fn from(e: DashboardError) -> Self {
        match e {
            DashboardError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Current month totals plus account balances.
#[derive(Debug, Clone)]
pub struct DashboardStats {
    /// Income and expenses for the current UTC month.
    pub summary: PeriodSummary,
    /// The user's accounts, ordered by id.
    pub accounts: Vec<accounts::Model>,
    /// Sum of all account balances.
    pub total_account_balance: Decimal,
}

/// Read-only dashboard queries.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the dashboard for the month containing `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn stats(
        &self,
        owner: UserId,
        now: DateTime<Utc>,
    ) -> Result<DashboardStats, DashboardError> {
        let window = PeriodWindow::current_month(now);

        let amounts: Vec<i64> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::AmountCents)
            .filter(transactions::Column::UserId.eq(owner.into_inner()))
            .filter(transactions::Column::CreatedAt.gte(window.start))
            .filter(transactions::Column::CreatedAt.lte(window.end))
            .into_tuple()
            .all(&self.db)
            .await?;

        let accounts = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(owner.into_inner()))
            .order_by_asc(accounts::Column::Id)
            .all(&self.db)
            .await?;

        let total_account_balance = DashboardService::total_balance(
            accounts.iter().map(|a| Amount::from_cents(a.amount_cents)),
        );

        Ok(DashboardStats {
            summary: DashboardService::summarize(amounts.into_iter().map(Amount::from_cents)),
            accounts,
            total_account_balance,
        })
    }
}
