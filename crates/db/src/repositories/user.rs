//! User repository for database operations.

use chrono::Utc;
use fintrack_shared::{AppError, types::UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};

use crate::entities::users;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::EmailTaken => Self::Conflict(e.to_string()),
            UserError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Creates a new user. Emails are compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmailTaken` if the email is already registered,
    /// including when a concurrent registration wins the unique index.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<users::Model, UserError> {
        let email = normalize_email(email);
        if self.email_exists(&email).await? {
            return Err(UserError::EmailTaken);
        }

        let now = Utc::now();
        let user = users::ActiveModel {
            name: Set(name.trim().to_string()),
            email: Set(email),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        user.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => UserError::EmailTaken,
            _ => UserError::Database(e),
        })
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(normalize_email(email)))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
