//! Category repository.
//!
//! Deleting a category nulls `category_id` on its transactions and
//! scheduled transactions and removes its budgets (foreign key actions).

use chrono::Utc;
use fintrack_shared::{
    AppError,
    types::{CategoryId, UserId},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::categories;

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found for this user.
    #[error("Category not found: {0}")]
    NotFound(CategoryId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CategoryError> for AppError {
    fn from(e: CategoryError) -> Self {
        match e {
            CategoryError::NotFound(_) => Self::NotFound(e.to_string()),
            CategoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the user's categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, owner: UserId) -> Result<Vec<categories::Model>, CategoryError> {
        Ok(categories::Entity::find()
            .filter(categories::Column::UserId.eq(owner.into_inner()))
            .order_by_asc(categories::Column::Name)
            .order_by_asc(categories::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Gets a category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if it does not exist or belongs to someone else.
    pub async fn get(
        &self,
        owner: UserId,
        id: CategoryId,
    ) -> Result<categories::Model, CategoryError> {
        categories::Entity::find_by_id(id.into_inner())
            .filter(categories::Column::UserId.eq(owner.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<categories::Model, CategoryError> {
        let now = Utc::now();
        let category = categories::ActiveModel {
            user_id: Set(owner.into_inner()),
            name: Set(name.trim().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(category.insert(&self.db).await?)
    }

    /// Renames a category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if it does not exist or belongs to someone else.
    pub async fn update(
        &self,
        owner: UserId,
        id: CategoryId,
        name: &str,
    ) -> Result<categories::Model, CategoryError> {
        let mut active: categories::ActiveModel = self.get(owner, id).await?.into();
        active.name = Set(name.trim().to_string());
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if it does not exist or belongs to someone else.
    pub async fn delete(&self, owner: UserId, id: CategoryId) -> Result<(), CategoryError> {
        let result = categories::Entity::delete_many()
            .filter(categories::Column::Id.eq(id.into_inner()))
            .filter(categories::Column::UserId.eq(owner.into_inner()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(CategoryError::NotFound(id));
        }
        Ok(())
    }
}
