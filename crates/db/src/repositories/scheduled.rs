//! Scheduled transaction repository and due-item processing.

use chrono::{DateTime, Utc};
use fintrack_core::schedule::{Repetition, ScheduleError, ScheduleService};
use fintrack_shared::{
    AppError,
    types::{AccountId, Amount, CategoryId, ScheduledTransactionId, UserId},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};

use super::ledger::{Ledger, TransactionError, TransactionInput};
use crate::entities::scheduled_transactions;

/// Error types for scheduled transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum ScheduledError {
    /// Scheduled transaction not found for this user.
    #[error("Scheduled transaction not found: {0}")]
    NotFound(ScheduledTransactionId),

    /// Reference check or materialized transaction failed.
    #[error(transparent)]
    Ledger(#[from] TransactionError),

    /// Stored repetition is unknown or the next date is out of range.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ScheduledError> for AppError {
    fn from(e: ScheduledError) -> Self {
        match e {
            ScheduledError::NotFound(_) => Self::NotFound(e.to_string()),
            ScheduledError::Ledger(e) => e.into(),
            ScheduledError::Schedule(_) => Self::Internal(e.to_string()),
            ScheduledError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating or replacing a scheduled transaction.
#[derive(Debug, Clone)]
pub struct ScheduledTransactionInput {
    /// Name copied onto each materialized transaction.
    pub name: String,
    /// Signed amount copied onto each materialized transaction.
    pub amount: Amount,
    /// Repetition rule.
    pub repetition: Repetition,
    /// Next due time.
    pub repeat_at: DateTime<Utc>,
    /// Optional category.
    pub category_id: Option<CategoryId>,
    /// Optional account.
    pub account_id: Option<AccountId>,
}

impl ScheduledTransactionInput {
    fn transaction(&self) -> TransactionInput {
        TransactionInput {
            name: self.name.clone(),
            amount: self.amount,
            category_id: self.category_id,
            account_id: self.account_id,
        }
    }
}

/// Counts from one processing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Items that produced a transaction and advanced.
    pub processed: u64,
    /// Items that failed and were left untouched.
    pub failed: u64,
}

/// Scheduled transaction repository.
#[derive(Debug, Clone)]
pub struct ScheduledTransactionRepository {
    db: DatabaseConnection,
}

impl ScheduledTransactionRepository {
    /// Creates a new scheduled transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the user's scheduled transactions, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        owner: UserId,
    ) -> Result<Vec<scheduled_transactions::Model>, ScheduledError> {
        Ok(scheduled_transactions::Entity::find()
            .filter(scheduled_transactions::Column::UserId.eq(owner.into_inner()))
            .order_by_asc(scheduled_transactions::Column::RepeatAt)
            .order_by_asc(scheduled_transactions::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Gets a scheduled transaction.
    ///
    /// # Errors
    ///
    /// Returns `ScheduledError::NotFound` if it does not exist or belongs to someone else.
    pub async fn get(
        &self,
        owner: UserId,
        id: ScheduledTransactionId,
    ) -> Result<scheduled_transactions::Model, ScheduledError> {
        scheduled_transactions::Entity::find_by_id(id.into_inner())
            .filter(scheduled_transactions::Column::UserId.eq(owner.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(ScheduledError::NotFound(id))
    }

    /// Creates a scheduled transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the category or account is not the owner's.
    pub async fn create(
        &self,
        owner: UserId,
        input: &ScheduledTransactionInput,
    ) -> Result<scheduled_transactions::Model, ScheduledError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;
        Ledger::new(&txn, owner)
            .check_references(&input.transaction())
            .await?;

        let model = scheduled_transactions::ActiveModel {
            user_id: Set(owner.into_inner()),
            name: Set(input.name.clone()),
            amount_cents: Set(input.amount.cents()),
            repetition: Set(input.repetition.as_str().to_string()),
            repeat_at: Set(input.repeat_at),
            category_id: Set(input.category_id.map(CategoryId::into_inner)),
            account_id: Set(input.account_id.map(AccountId::into_inner)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(model)
    }

    /// Replaces every field of a scheduled transaction.
    ///
    /// # Errors
    ///
    /// Returns `ScheduledError::NotFound`, or an error if a reference is invalid.
    pub async fn update(
        &self,
        owner: UserId,
        id: ScheduledTransactionId,
        input: &ScheduledTransactionInput,
    ) -> Result<scheduled_transactions::Model, ScheduledError> {
        let txn = self.db.begin().await?;
        let existing = scheduled_transactions::Entity::find_by_id(id.into_inner())
            .filter(scheduled_transactions::Column::UserId.eq(owner.into_inner()))
            .one(&txn)
            .await?
            .ok_or(ScheduledError::NotFound(id))?;
        Ledger::new(&txn, owner)
            .check_references(&input.transaction())
            .await?;

        let mut active: scheduled_transactions::ActiveModel = existing.into();
        active.name = Set(input.name.clone());
        active.amount_cents = Set(input.amount.cents());
        active.repetition = Set(input.repetition.as_str().to_string());
        active.repeat_at = Set(input.repeat_at);
        active.category_id = Set(input.category_id.map(CategoryId::into_inner));
        active.account_id = Set(input.account_id.map(AccountId::into_inner));
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes a scheduled transaction. Transactions it produced are kept.
    ///
    /// # Errors
    ///
    /// Returns `ScheduledError::NotFound` if it does not exist or belongs to someone else.
    pub async fn delete(
        &self,
        owner: UserId,
        id: ScheduledTransactionId,
    ) -> Result<(), ScheduledError> {
        let result = scheduled_transactions::Entity::delete_many()
            .filter(scheduled_transactions::Column::Id.eq(id.into_inner()))
            .filter(scheduled_transactions::Column::UserId.eq(owner.into_inner()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ScheduledError::NotFound(id));
        }
        Ok(())
    }

    /// Materializes every item due at `now`, oldest first.
    ///
    /// Each item commits on its own. A failing item is logged, counted and
    /// left as it was; an item is advanced at most once per call.
    ///
    /// # Errors
    ///
    /// Returns an error only if the due set cannot be loaded.
    pub async fn process_due(
        &self,
        owner: UserId,
        now: DateTime<Utc>,
    ) -> Result<ProcessOutcome, ScheduledError> {
        let due: Vec<i32> = scheduled_transactions::Entity::find()
            .select_only()
            .column(scheduled_transactions::Column::Id)
            .filter(scheduled_transactions::Column::UserId.eq(owner.into_inner()))
            .filter(scheduled_transactions::Column::RepeatAt.lte(now))
            .order_by_asc(scheduled_transactions::Column::RepeatAt)
            .order_by_asc(scheduled_transactions::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut outcome = ProcessOutcome::default();
        for id in due {
            match self.process_one(owner, id, now).await {
                Ok(true) => outcome.processed += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(scheduled_id = id, error = %e, "Failed to process scheduled transaction");
                    outcome.failed += 1;
                }
            }
        }

        info!(
            user_id = %owner,
            processed = outcome.processed,
            failed = outcome.failed,
            "Processed scheduled transactions"
        );
        Ok(outcome)
    }

    /// Returns false when the item vanished or was advanced concurrently.
    async fn process_one(
        &self,
        owner: UserId,
        id: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, ScheduledError> {
        let txn = self.db.begin().await?;

        let Some(item) = scheduled_transactions::Entity::find_by_id(id)
            .filter(scheduled_transactions::Column::UserId.eq(owner.into_inner()))
            .one(&txn)
            .await?
        else {
            return Ok(false);
        };
        if !ScheduleService::is_due(item.repeat_at, now) {
            return Ok(false);
        }

        let repetition: Repetition = item.repetition.parse()?;
        let next = ScheduleService::next_occurrence(item.repeat_at, repetition)?;

        let input = TransactionInput {
            name: item.name.clone(),
            amount: Amount::from_cents(item.amount_cents),
            category_id: item.category_id.map(CategoryId::new),
            account_id: item.account_id.map(AccountId::new),
        };
        Ledger::new(&txn, owner).create(&input, now).await?;

        let mut active: scheduled_transactions::ActiveModel = item.into();
        active.repeat_at = Set(next);
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(true)
    }
}
