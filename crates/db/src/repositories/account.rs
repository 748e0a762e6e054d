//! Bank account repository.
//!
//! The stored balance is never written directly: it starts at zero and
//! moves only through [`Ledger`]. An opening balance is recorded as a
//! regular transaction in the same database transaction as the account.

use chrono::Utc;
use fintrack_shared::{
    AppError,
    types::{AccountId, Amount, UserId},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::ledger::{Ledger, TransactionError, TransactionInput};
use crate::entities::accounts;

/// Name given to the transaction that carries an opening balance.
pub const OPENING_BALANCE_NAME: &str = "Opening balance";

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found for this user.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// Recording the opening balance failed.
    #[error(transparent)]
    Ledger(#[from] TransactionError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::NotFound(_) => Self::NotFound(e.to_string()),
            AccountError::Ledger(e) => e.into(),
            AccountError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Bank or display name.
    pub bank_name: String,
    /// Starting balance, recorded as a transaction when non-zero.
    pub opening_balance: Amount,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the user's accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, owner: UserId) -> Result<Vec<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(owner.into_inner()))
            .order_by_asc(accounts::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Gets an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if it does not exist or belongs to someone else.
    pub async fn get(&self, owner: UserId, id: AccountId) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(id.into_inner())
            .filter(accounts::Column::UserId.eq(owner.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id))
    }

    /// Creates an account, recording a non-zero opening balance through the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails; nothing is persisted in that case.
    pub async fn create(
        &self,
        owner: UserId,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let account = accounts::ActiveModel {
            user_id: Set(owner.into_inner()),
            bank_name: Set(input.bank_name.trim().to_string()),
            amount_cents: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if input.opening_balance.is_zero() {
            txn.commit().await?;
            return Ok(account);
        }

        let opening = TransactionInput {
            name: OPENING_BALANCE_NAME.to_string(),
            amount: input.opening_balance,
            category_id: None,
            account_id: Some(AccountId::new(account.id)),
        };
        Ledger::new(&txn, owner).create(&opening, now).await?;

        let account = accounts::Entity::find_by_id(account.id)
            .one(&txn)
            .await?
            .ok_or(AccountError::NotFound(AccountId::new(account.id)))?;

        txn.commit().await?;
        Ok(account)
    }

    /// Renames an account. The balance is not writable here.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if it does not exist or belongs to someone else.
    pub async fn rename(
        &self,
        owner: UserId,
        id: AccountId,
        bank_name: &str,
    ) -> Result<accounts::Model, AccountError> {
        let mut active: accounts::ActiveModel = self.get(owner, id).await?.into();
        active.bank_name = Set(bank_name.trim().to_string());
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an account. Linked transactions keep existing with no account.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if it does not exist or belongs to someone else.
    pub async fn delete(&self, owner: UserId, id: AccountId) -> Result<(), AccountError> {
        let result = accounts::Entity::delete_many()
            .filter(accounts::Column::Id.eq(id.into_inner()))
            .filter(accounts::Column::UserId.eq(owner.into_inner()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AccountError::NotFound(id));
        }
        Ok(())
    }
}
