//! Integration tests for budget spend and limit checks.

mod common;

use chrono::{Duration, Utc};
use common::{at, cents, create_category, create_user, setup};
use fintrack_core::budget::BudgetCriteria;
use fintrack_db::{
    BudgetRepository, CategoryRepository, TransactionRepository,
    repositories::{BudgetError, BudgetInput, Ledger, TransactionInput},
};
use fintrack_shared::types::{BudgetId, CategoryId, UserId};
use rust_decimal_macros::dec;
use sea_orm::{DatabaseConnection, TransactionTrait};

fn expense(amount_cents: i64, category_id: CategoryId) -> TransactionInput {
    TransactionInput {
        name: "Expense".to_string(),
        amount: cents(amount_cents),
        category_id: Some(category_id),
        account_id: None,
    }
}

async fn record_at(
    db: &DatabaseConnection,
    owner: UserId,
    input: &TransactionInput,
    when: chrono::DateTime<Utc>,
) {
    let txn = db.begin().await.unwrap();
    Ledger::new(&txn, owner).create(input, when).await.unwrap();
    txn.commit().await.unwrap();
}

#[tokio::test]
async fn test_budget_spend_and_percentage() {
    let (db, owner) = setup().await;
    let food = create_category(&db, owner, "Food").await;
    let budgets = BudgetRepository::new(db.clone());

    let budget = budgets
        .create(
            owner,
            BudgetInput {
                category_id: food,
                amount: cents(50_000),
                criteria: BudgetCriteria::Monthly,
            },
        )
        .await
        .unwrap();
    TransactionRepository::new(db.clone())
        .create(owner, expense(-15_000, food))
        .await
        .unwrap();

    let loaded = budgets
        .get(owner, BudgetId::new(budget.id), Utc::now())
        .await
        .unwrap();
    assert_eq!(loaded.category_name.as_deref(), Some("Food"));
    assert_eq!(loaded.spend.spent, dec!(150));
    assert_eq!(loaded.spend.remaining, dec!(350));
    assert_eq!(loaded.spend.percentage, dec!(70));
}

#[tokio::test]
async fn test_spend_ignores_income_other_categories_and_old_months() {
    let (db, owner) = setup().await;
    let food = create_category(&db, owner, "Food").await;
    let rent = create_category(&db, owner, "Rent").await;
    let now = at(2024, 3, 20);

    BudgetRepository::new(db.clone())
        .create(
            owner,
            BudgetInput {
                category_id: food,
                amount: cents(10_000),
                criteria: BudgetCriteria::Monthly,
            },
        )
        .await
        .unwrap();

    record_at(&db, owner, &expense(-2_000, food), at(2024, 3, 2)).await;
    record_at(&db, owner, &expense(5_000, food), at(2024, 3, 3)).await;
    record_at(&db, owner, &expense(-9_000, rent), at(2024, 3, 4)).await;
    record_at(&db, owner, &expense(-4_000, food), at(2024, 2, 28)).await;
    record_at(&db, owner, &expense(-1_000, food), now + Duration::days(1)).await;

    let listed = BudgetRepository::new(db.clone()).list(owner, now).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].spend.spent, dec!(20));
    assert_eq!(listed[0].spend.remaining, dec!(80));
}

#[tokio::test]
async fn test_annual_budget_counts_whole_year() {
    let (db, owner) = setup().await;
    let travel = create_category(&db, owner, "Travel").await;
    let now = at(2024, 6, 1);

    BudgetRepository::new(db.clone())
        .create(
            owner,
            BudgetInput {
                category_id: travel,
                amount: cents(100_000),
                criteria: BudgetCriteria::Annual,
            },
        )
        .await
        .unwrap();
    record_at(&db, owner, &expense(-30_000, travel), at(2024, 1, 10)).await;
    record_at(&db, owner, &expense(-20_000, travel), at(2023, 12, 31)).await;

    let listed = BudgetRepository::new(db.clone()).list(owner, now).await.unwrap();
    assert_eq!(listed[0].spend.spent, dec!(300));
}

#[tokio::test]
async fn test_check_reports_exceeded() {
    let (db, owner) = setup().await;
    let food = create_category(&db, owner, "Food").await;
    let now = at(2024, 3, 20);
    let budgets = BudgetRepository::new(db.clone());

    budgets
        .create(
            owner,
            BudgetInput {
                category_id: food,
                amount: cents(50_000),
                criteria: BudgetCriteria::Monthly,
            },
        )
        .await
        .unwrap();
    record_at(&db, owner, &expense(-40_000, food), at(2024, 3, 5)).await;

    let result = budgets
        .check(owner, Some(food), cents(-15_000), now)
        .await
        .unwrap();
    assert!(result.exceeded);
    assert_eq!(result.spent, Some(dec!(400)));
    assert_eq!(result.new_total, Some(dec!(550)));
    assert!(result.budget.is_some());

    let within = budgets
        .check(owner, Some(food), cents(-5_000), now)
        .await
        .unwrap();
    assert!(!within.exceeded);
    assert_eq!(within.new_total, Some(dec!(450)));
}

#[tokio::test]
async fn test_check_without_budget_or_for_income() {
    let (db, owner) = setup().await;
    let food = create_category(&db, owner, "Food").await;
    let budgets = BudgetRepository::new(db.clone());
    let now = Utc::now();

    let no_budget = budgets.check(owner, Some(food), cents(-100), now).await.unwrap();
    assert!(!no_budget.exceeded);
    assert!(no_budget.budget.is_none());

    let no_category = budgets.check(owner, None, cents(-100), now).await.unwrap();
    assert!(!no_category.exceeded);

    budgets
        .create(
            owner,
            BudgetInput {
                category_id: food,
                amount: cents(100),
                criteria: BudgetCriteria::Monthly,
            },
        )
        .await
        .unwrap();
    let income = budgets.check(owner, Some(food), cents(1_000_000), now).await.unwrap();
    assert!(!income.exceeded);
    assert!(income.spent.is_none());
}

#[tokio::test]
async fn test_budget_requires_owned_category() {
    let (db, owner) = setup().await;
    let other = create_user(&db, "other@example.com").await;
    let theirs = create_category(&db, other, "Theirs").await;

    let result = BudgetRepository::new(db.clone())
        .create(
            owner,
            BudgetInput {
                category_id: theirs,
                amount: cents(1_000),
                criteria: BudgetCriteria::Monthly,
            },
        )
        .await;

    assert!(matches!(result, Err(BudgetError::CategoryNotFound(_))));
}

#[tokio::test]
async fn test_update_and_delete_budget() {
    let (db, owner) = setup().await;
    let food = create_category(&db, owner, "Food").await;
    let budgets = BudgetRepository::new(db.clone());

    let budget = budgets
        .create(
            owner,
            BudgetInput {
                category_id: food,
                amount: cents(1_000),
                criteria: BudgetCriteria::Monthly,
            },
        )
        .await
        .unwrap();
    let id = BudgetId::new(budget.id);

    let updated = budgets
        .update(
            owner,
            id,
            BudgetInput {
                category_id: food,
                amount: cents(2_500),
                criteria: BudgetCriteria::Annual,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount_cents, 2_500);
    assert_eq!(updated.criteria, "annual");

    budgets.delete(owner, id).await.unwrap();
    assert!(matches!(
        budgets.get(owner, id, Utc::now()).await,
        Err(BudgetError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_deleting_category_removes_budgets() {
    let (db, owner) = setup().await;
    let food = create_category(&db, owner, "Food").await;
    let budgets = BudgetRepository::new(db.clone());

    budgets
        .create(
            owner,
            BudgetInput {
                category_id: food,
                amount: cents(1_000),
                criteria: BudgetCriteria::Monthly,
            },
        )
        .await
        .unwrap();
    CategoryRepository::new(db.clone())
        .delete(owner, food)
        .await
        .unwrap();

    assert!(budgets.list(owner, Utc::now()).await.unwrap().is_empty());
}
