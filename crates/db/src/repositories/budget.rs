//! Budget repository.
//!
//! Spend is loaded as raw amounts for the budget's window and evaluated by
//! `fintrack_core::budget::BudgetService`.

use chrono::{DateTime, Utc};
use fintrack_core::budget::{BudgetCriteria, BudgetError as CriteriaError, BudgetService, BudgetSpend};
use fintrack_shared::{
    AppError,
    types::{Amount, BudgetId, CategoryId, UserId},
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{budgets, categories, transactions};

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// Budget not found for this user.
    #[error("Budget not found: {0}")]
    NotFound(BudgetId),

    /// Target category does not exist or belongs to someone else.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Stored criteria could not be parsed.
    #[error(transparent)]
    Criteria(#[from] CriteriaError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<BudgetError> for AppError {
    fn from(e: BudgetError) -> Self {
        match e {
            BudgetError::NotFound(_) => Self::NotFound(e.to_string()),
            BudgetError::CategoryNotFound(_) => Self::Validation(e.to_string()),
            BudgetError::Criteria(_) => Self::Internal(e.to_string()),
            BudgetError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating or replacing a budget.
#[derive(Debug, Clone, Copy)]
pub struct BudgetInput {
    /// Category whose expenses count against the budget.
    pub category_id: CategoryId,
    /// Spending limit.
    pub amount: Amount,
    /// Evaluation window.
    pub criteria: BudgetCriteria,
}

/// Budget with its category name and current spend.
#[derive(Debug, Clone)]
pub struct BudgetWithSpend {
    /// The budget record.
    pub budget: budgets::Model,
    /// Name of the target category.
    pub category_name: Option<String>,
    /// Spend for the current window.
    pub spend: BudgetSpend,
}

/// Result of checking a proposed expense.
///
/// Only `exceeded` is set when there is nothing to compare against.
#[derive(Debug, Clone)]
pub struct BudgetCheckResult {
    /// Whether the expense would push spend above the limit.
    pub exceeded: bool,
    /// The budget that was checked.
    pub budget: Option<budgets::Model>,
    /// Spend so far in the window.
    pub spent: Option<Decimal>,
    /// Spend including the proposed expense.
    pub new_total: Option<Decimal>,
}

impl BudgetCheckResult {
    const fn not_exceeded() -> Self {
        Self {
            exceeded: false,
            budget: None,
            spent: None,
            new_total: None,
        }
    }
}

/// Budget repository for CRUD and spend evaluation.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the user's budgets with spend evaluated at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        owner: UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<BudgetWithSpend>, BudgetError> {
        let rows = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(owner.into_inner()))
            .order_by_asc(budgets::Column::Id)
            .find_also_related(categories::Entity)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(rows.len());
        for (budget, category) in rows {
            let spend = self.evaluate(owner, &budget, now).await?;
            result.push(BudgetWithSpend {
                budget,
                category_name: category.map(|c| c.name),
                spend,
            });
        }
        Ok(result)
    }

    /// Gets a budget with spend evaluated at `now`.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if it does not exist or belongs to someone else.
    pub async fn get(
        &self,
        owner: UserId,
        id: BudgetId,
        now: DateTime<Utc>,
    ) -> Result<BudgetWithSpend, BudgetError> {
        let (budget, category) = budgets::Entity::find_by_id(id.into_inner())
            .filter(budgets::Column::UserId.eq(owner.into_inner()))
            .find_also_related(categories::Entity)
            .one(&self.db)
            .await?
            .ok_or(BudgetError::NotFound(id))?;

        let spend = self.evaluate(owner, &budget, now).await?;
        Ok(BudgetWithSpend {
            budget,
            category_name: category.map(|c| c.name),
            spend,
        })
    }

    /// Creates a budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::CategoryNotFound` if the category is not the owner's.
    pub async fn create(
        &self,
        owner: UserId,
        input: BudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        self.ensure_category(owner, input.category_id).await?;

        let now = Utc::now();
        let budget = budgets::ActiveModel {
            user_id: Set(owner.into_inner()),
            category_id: Set(input.category_id.into_inner()),
            amount_cents: Set(input.amount.cents()),
            criteria: Set(input.criteria.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(budget.insert(&self.db).await?)
    }

    /// Replaces a budget's category, limit and criteria.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` or `BudgetError::CategoryNotFound`.
    pub async fn update(
        &self,
        owner: UserId,
        id: BudgetId,
        input: BudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        let existing = budgets::Entity::find_by_id(id.into_inner())
            .filter(budgets::Column::UserId.eq(owner.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(BudgetError::NotFound(id))?;
        self.ensure_category(owner, input.category_id).await?;

        let mut active: budgets::ActiveModel = existing.into();
        active.category_id = Set(input.category_id.into_inner());
        active.amount_cents = Set(input.amount.cents());
        active.criteria = Set(input.criteria.as_str().to_string());
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if it does not exist or belongs to someone else.
    pub async fn delete(&self, owner: UserId, id: BudgetId) -> Result<(), BudgetError> {
        let result = budgets::Entity::delete_many()
            .filter(budgets::Column::Id.eq(id.into_inner()))
            .filter(budgets::Column::UserId.eq(owner.into_inner()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(BudgetError::NotFound(id));
        }
        Ok(())
    }

    /// Checks whether a proposed transaction would exceed its category budget.
    ///
    /// Income, a missing category, or a category without a budget are never
    /// exceeded. With several budgets on one category the oldest is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn check(
        &self,
        owner: UserId,
        category_id: Option<CategoryId>,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<BudgetCheckResult, BudgetError> {
        let Some(category_id) = category_id else {
            return Ok(BudgetCheckResult::not_exceeded());
        };
        if !amount.is_negative() {
            return Ok(BudgetCheckResult::not_exceeded());
        }

        let Some(budget) = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(owner.into_inner()))
            .filter(budgets::Column::CategoryId.eq(category_id.into_inner()))
            .order_by_asc(budgets::Column::Id)
            .one(&self.db)
            .await?
        else {
            return Ok(BudgetCheckResult::not_exceeded());
        };

        let criteria: BudgetCriteria = budget.criteria.parse()?;
        let spent = self.spent(owner, budget.category_id, criteria, now).await?;
        let limit = Amount::from_cents(budget.amount_cents);

        Ok(match BudgetService::check(limit, spent, amount) {
            Some(check) => BudgetCheckResult {
                exceeded: check.exceeded,
                budget: Some(budget),
                spent: Some(check.spent),
                new_total: Some(check.new_total),
            },
            None => BudgetCheckResult::not_exceeded(),
        })
    }

    async fn evaluate(
        &self,
        owner: UserId,
        budget: &budgets::Model,
        now: DateTime<Utc>,
    ) -> Result<BudgetSpend, BudgetError> {
        let criteria: BudgetCriteria = budget.criteria.parse()?;
        let spent = self.spent(owner, budget.category_id, criteria, now).await?;
        Ok(BudgetService::evaluate(
            Amount::from_cents(budget.amount_cents),
            spent,
        ))
    }

    /// Absolute expense total in the category over the criteria window.
    async fn spent(
        &self,
        owner: UserId,
        category_id: i32,
        criteria: BudgetCriteria,
        now: DateTime<Utc>,
    ) -> Result<Decimal, BudgetError> {
        let window = BudgetService::window(criteria, now);

        let amounts: Vec<i64> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::AmountCents)
            .filter(transactions::Column::UserId.eq(owner.into_inner()))
            .filter(transactions::Column::CategoryId.eq(category_id))
            .filter(transactions::Column::AmountCents.lt(0))
            .filter(transactions::Column::CreatedAt.gte(window.start))
            .filter(transactions::Column::CreatedAt.lte(window.end))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(BudgetService::spent(
            amounts.into_iter().map(Amount::from_cents),
        ))
    }

    async fn ensure_category(
        &self,
        owner: UserId,
        category_id: CategoryId,
    ) -> Result<(), BudgetError> {
        let count = categories::Entity::find_by_id(category_id.into_inner())
            .filter(categories::Column::UserId.eq(owner.into_inner()))
            .count(&self.db)
            .await?;

        if count == 0 {
            return Err(BudgetError::CategoryNotFound(category_id));
        }
        Ok(())
    }
}
