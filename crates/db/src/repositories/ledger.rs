//! Transaction writes with their account balance effects.
//!
//! [`Ledger`] runs inside a database transaction owned by the caller. Each
//! operation validates references, writes the transaction row and applies
//! the [`BalancePlan`] computed by `fintrack_core::ledger`, so the caller's
//! commit makes all of it visible at once and any error rolls all of it back.

use chrono::{DateTime, Utc};
use fintrack_core::ledger::{BalancePlan, LedgerError, LedgerService, Posting};
use fintrack_shared::types::{AccountId, Amount, CategoryId, TransactionId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, sea_query::Expr,
};

use crate::entities::{accounts, categories, transactions};

/// Errors raised while writing through the ledger.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found for this user.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Referenced account does not exist or belongs to someone else.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Referenced category does not exist or belongs to someone else.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// The balance update matched no row.
    #[error("Balance update failed for account {0}")]
    BalanceUpdateFailed(AccountId),

    /// Planning the balance change failed.
    #[error(transparent)]
    Plan(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Fields of a transaction as written by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInput {
    /// Description.
    pub name: String,
    /// Signed amount. Positive is income.
    pub amount: Amount,
    /// Optional category.
    pub category_id: Option<CategoryId>,
    /// Optional account whose balance follows this transaction.
    pub account_id: Option<AccountId>,
}

impl TransactionInput {
    fn posting(&self) -> Posting {
        Posting::new(self.account_id, self.amount)
    }
}

/// Ledger writer bound to one database transaction and one owner.
pub struct Ledger<'a> {
    txn: &'a DatabaseTransaction,
    owner: UserId,
}

impl<'a> Ledger<'a> {
    /// Binds a ledger writer to an open database transaction.
    #[must_use]
    pub const fn new(txn: &'a DatabaseTransaction, owner: UserId) -> Self {
        Self { txn, owner }
    }

    /// Inserts a transaction and adds its amount to the linked account.
    ///
    /// # Errors
    ///
    /// Returns an error if a reference is invalid or a write fails.
    pub async fn create(
        &self,
        input: &TransactionInput,
        now: DateTime<Utc>,
    ) -> Result<transactions::Model, TransactionError> {
        self.check_references(input).await?;

        let model = transactions::ActiveModel {
            user_id: Set(self.owner.into_inner()),
            name: Set(input.name.clone()),
            amount_cents: Set(input.amount.cents()),
            category_id: Set(input.category_id.map(CategoryId::into_inner)),
            account_id: Set(input.account_id.map(AccountId::into_inner)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.txn)
        .await?;

        self.apply(&LedgerService::plan_create(&input.posting()))
            .await?;
        Ok(model)
    }

    /// Replaces a transaction's fields and corrects the affected balances.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::TransactionNotFound` if the transaction is not the owner's,
    /// or an error if a reference is invalid or a write fails.
    pub async fn update(
        &self,
        id: TransactionId,
        input: &TransactionInput,
        now: DateTime<Utc>,
    ) -> Result<transactions::Model, TransactionError> {
        let existing = self.find(id).await?;
        self.check_references(input).await?;

        let plan = LedgerService::plan_update(&posting_of(&existing), &input.posting())?;

        let mut active: transactions::ActiveModel = existing.into();
        active.name = Set(input.name.clone());
        active.amount_cents = Set(input.amount.cents());
        active.category_id = Set(input.category_id.map(CategoryId::into_inner));
        active.account_id = Set(input.account_id.map(AccountId::into_inner));
        active.updated_at = Set(now);
        let updated = active.update(self.txn).await?;

        self.apply(&plan).await?;
        Ok(updated)
    }

    /// Deletes a transaction and subtracts its amount from the linked account.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::TransactionNotFound` if the transaction is not the owner's.
    pub async fn delete(&self, id: TransactionId) -> Result<(), TransactionError> {
        let existing = self.find(id).await?;
        let plan = LedgerService::plan_delete(&posting_of(&existing))?;

        transactions::Entity::delete_by_id(existing.id)
            .exec(self.txn)
            .await?;

        self.apply(&plan).await
    }

    async fn find(&self, id: TransactionId) -> Result<transactions::Model, TransactionError> {
        transactions::Entity::find_by_id(id.into_inner())
            .filter(transactions::Column::UserId.eq(self.owner.into_inner()))
            .one(self.txn)
            .await?
            .ok_or(TransactionError::TransactionNotFound(id))
    }

    /// Rejects references to accounts or categories the owner does not have.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `CategoryNotFound`.
    pub async fn check_references(&self, input: &TransactionInput) -> Result<(), TransactionError> {
        if let Some(account_id) = input.account_id {
            let count = accounts::Entity::find_by_id(account_id.into_inner())
                .filter(accounts::Column::UserId.eq(self.owner.into_inner()))
                .count(self.txn)
                .await?;
            if count == 0 {
                return Err(TransactionError::AccountNotFound(account_id));
            }
        }

        if let Some(category_id) = input.category_id {
            let count = categories::Entity::find_by_id(category_id.into_inner())
                .filter(categories::Column::UserId.eq(self.owner.into_inner()))
                .count(self.txn)
                .await?;
            if count == 0 {
                return Err(TransactionError::CategoryNotFound(category_id));
            }
        }

        Ok(())
    }

    /// Applies each adjustment as `amount_cents = amount_cents + delta`.
    async fn apply(&self, plan: &BalancePlan) -> Result<(), TransactionError> {
        for adjustment in plan.adjustments() {
            let result = accounts::Entity::update_many()
                .col_expr(
                    accounts::Column::AmountCents,
                    Expr::col(accounts::Column::AmountCents).add(adjustment.delta.cents()),
                )
                .filter(accounts::Column::Id.eq(adjustment.account_id.into_inner()))
                .filter(accounts::Column::UserId.eq(self.owner.into_inner()))
                .exec(self.txn)
                .await?;

            if result.rows_affected != 1 {
                return Err(TransactionError::BalanceUpdateFailed(adjustment.account_id));
            }
        }
        Ok(())
    }
}

fn posting_of(model: &transactions::Model) -> Posting {
    Posting::new(
        model.account_id.map(AccountId::new),
        Amount::from_cents(model.amount_cents),
    )
}
