//! Shared setup for repository integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use fintrack_db::{
    AccountRepository, CategoryRepository, UserRepository,
    migration::Migrator,
    repositories::CreateAccountInput,
};
use fintrack_shared::types::{AccountId, Amount, CategoryId, UserId};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Fresh in-memory database with the schema applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Fresh database plus one registered user.
pub async fn setup() -> (DatabaseConnection, UserId) {
    let db = setup_db().await;
    let owner = create_user(&db, "owner@example.com").await;
    (db, owner)
}

pub async fn create_user(db: &DatabaseConnection, email: &str) -> UserId {
    let user = UserRepository::new(db.clone())
        .create("Test User", email, "hash")
        .await
        .expect("Failed to create user");
    UserId::new(user.id)
}

pub async fn create_account(db: &DatabaseConnection, owner: UserId, name: &str) -> AccountId {
    let account = AccountRepository::new(db.clone())
        .create(
            owner,
            CreateAccountInput {
                bank_name: name.to_string(),
                opening_balance: Amount::ZERO,
            },
        )
        .await
        .expect("Failed to create account");
    AccountId::new(account.id)
}

pub async fn create_category(db: &DatabaseConnection, owner: UserId, name: &str) -> CategoryId {
    let category = CategoryRepository::new(db.clone())
        .create(owner, name)
        .await
        .expect("Failed to create category");
    CategoryId::new(category.id)
}

pub async fn balance_cents(db: &DatabaseConnection, owner: UserId, id: AccountId) -> i64 {
    AccountRepository::new(db.clone())
        .get(owner, id)
        .await
        .expect("Failed to load account")
        .amount_cents
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap()
}

pub fn cents(value: i64) -> Amount {
    Amount::from_cents(value)
}
