//! Transaction repository.
//!
//! Writes go through [`Ledger`] inside a single database transaction so the
//! linked account balance always moves together with the row.

use chrono::Utc;
use fintrack_shared::{
    AppError,
    types::{AccountId, CategoryId, TransactionId, UserId},
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use super::ledger::{Ledger, TransactionError, TransactionInput};
use crate::entities::{categories, transactions};

impl From<TransactionError> for AppError {
    fn from(e: TransactionError) -> Self {
        match e {
            TransactionError::TransactionNotFound(_) => Self::NotFound(e.to_string()),
            TransactionError::AccountNotFound(_) | TransactionError::CategoryNotFound(_) => {
                Self::Validation(e.to_string())
            }
            TransactionError::BalanceUpdateFailed(_) | TransactionError::Plan(_) => {
                Self::Internal(e.to_string())
            }
            TransactionError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    /// Only transactions in this category.
    pub category_id: Option<CategoryId>,
    /// Only transactions on this account.
    pub account_id: Option<AccountId>,
}

/// Transaction with its category name for listing.
#[derive(Debug, Clone)]
pub struct TransactionWithCategory {
    /// The transaction record.
    pub transaction: transactions::Model,
    /// Name of the linked category, if any.
    pub category_name: Option<String>,
}

/// Transaction repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the user's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        owner: UserId,
        filter: TransactionFilter,
    ) -> Result<Vec<TransactionWithCategory>, TransactionError> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(owner.into_inner()));

        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id.into_inner()));
        }
        if let Some(account_id) = filter.account_id {
            query = query.filter(transactions::Column::AccountId.eq(account_id.into_inner()));
        }

        let rows = query
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .find_also_related(categories::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(transaction, category)| TransactionWithCategory {
                transaction,
                category_name: category.map(|c| c.name),
            })
            .collect())
    }

    /// Gets a transaction with its category name.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::TransactionNotFound` if it is not the owner's.
    pub async fn get(
        &self,
        owner: UserId,
        id: TransactionId,
    ) -> Result<TransactionWithCategory, TransactionError> {
        let (transaction, category) = transactions::Entity::find_by_id(id.into_inner())
            .filter(transactions::Column::UserId.eq(owner.into_inner()))
            .find_also_related(categories::Entity)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::TransactionNotFound(id))?;

        Ok(TransactionWithCategory {
            transaction,
            category_name: category.map(|c| c.name),
        })
    }

    /// Creates a transaction and applies its amount to the linked account.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a foreign or missing account/category;
    /// nothing is written in that case.
    pub async fn create(
        &self,
        owner: UserId,
        input: TransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let txn = self.db.begin().await?;
        let model = Ledger::new(&txn, owner).create(&input, Utc::now()).await?;
        txn.commit().await?;
        Ok(model)
    }

    /// Replaces a transaction and corrects the old and new account balances.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::TransactionNotFound` if it is not the owner's.
    pub async fn update(
        &self,
        owner: UserId,
        id: TransactionId,
        input: TransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let txn = self.db.begin().await?;
        let model = Ledger::new(&txn, owner)
            .update(id, &input, Utc::now())
            .await?;
        txn.commit().await?;
        Ok(model)
    }

    /// Deletes a transaction and reverses its balance effect.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::TransactionNotFound` if it is not the owner's.
    pub async fn delete(&self, owner: UserId, id: TransactionId) -> Result<(), TransactionError> {
        let txn = self.db.begin().await?;
        Ledger::new(&txn, owner).delete(id).await?;
        txn.commit().await?;
        Ok(())
    }
}
