//! Budget routes.
//!
//! Every budget read carries its spend for the current window.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use fintrack_core::budget::BudgetCriteria;
use fintrack_db::{
    BudgetRepository,
    entities::budgets,
    repositories::{BudgetCheckResult, BudgetInput, BudgetWithSpend},
};
use fintrack_shared::types::{Amount, BudgetId, CategoryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    AppState,
    error::ApiError,
    extractors::{PathParams, ValidatedJson},
    middleware::AuthUser,
};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/check", post(check_budget))
        .route(
            "/budgets/{id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating or replacing a budget.
#[derive(Debug, Deserialize, Validate)]
pub struct BudgetRequest {
    /// Category whose expenses count against the budget.
    pub category_id: CategoryId,
    /// Spending limit.
    pub amount: Amount,
    /// `monthly` or `annual`.
    pub criteria: BudgetCriteria,
}

impl From<BudgetRequest> for BudgetInput {
    fn from(req: BudgetRequest) -> Self {
        Self {
            category_id: req.category_id,
            amount: req.amount,
            criteria: req.criteria,
        }
    }
}

/// Request body for checking a prospective transaction.
#[derive(Debug, Deserialize, Validate)]
pub struct BudgetCheckRequest {
    /// Category of the prospective transaction.
    pub category_id: Option<CategoryId>,
    /// Signed amount of the prospective transaction.
    pub amount: Amount,
}

/// Budget record without spend.
#[derive(Debug, Serialize)]
pub struct BudgetSummary {
    /// Budget ID.
    pub id: BudgetId,
    /// Target category.
    pub category_id: CategoryId,
    /// Spending limit.
    pub amount: Amount,
    /// Evaluation window.
    pub criteria: String,
    /// Created at timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<budgets::Model> for BudgetSummary {
    fn from(model: budgets::Model) -> Self {
        Self {
            id: BudgetId::new(model.id),
            category_id: CategoryId::new(model.category_id),
            amount: Amount::from_cents(model.amount_cents),
            criteria: model.criteria,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Budget with its current spend.
#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    /// Budget fields.
    #[serde(flatten)]
    pub budget: BudgetSummary,
    /// Target category name.
    pub category_name: Option<String>,
    /// Expenses in the current window.
    pub spent: Decimal,
    /// Limit minus spent.
    pub remaining: Decimal,
    /// Remaining as a percentage of the limit.
    pub percentage: Decimal,
}

impl From<BudgetWithSpend> for BudgetResponse {
    fn from(row: BudgetWithSpend) -> Self {
        Self {
            budget: row.budget.into(),
            category_name: row.category_name,
            spent: row.spend.spent,
            remaining: row.spend.remaining,
            percentage: row.spend.percentage,
        }
    }
}

/// Response for a budget check.
#[derive(Debug, Serialize)]
pub struct BudgetCheckResponse {
    /// Whether the prospective expense would exceed the limit.
    pub exceeded: bool,
    /// Limit of the budget that was checked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<Amount>,
    /// Spend so far.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent: Option<Decimal>,
    /// Spend including the prospective expense.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_total: Option<Decimal>,
}

impl From<BudgetCheckResult> for BudgetCheckResponse {
    fn from(result: BudgetCheckResult) -> Self {
        Self {
            exceeded: result.exceeded,
            budget: result
                .budget
                .map(|budget| Amount::from_cents(budget.amount_cents)),
            spent: result.spent,
            new_total: result.new_total,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

fn repo(state: &AppState) -> BudgetRepository {
    BudgetRepository::new((*state.db).clone())
}

/// GET /budgets
async fn list_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let rows = repo(&state).list(auth.user_id(), Utc::now()).await?;
    Ok(Json(
        rows.into_iter()
            .map(BudgetResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// POST /budgets
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<BudgetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = repo(&state);
    let owner = auth.user_id();
    let budget = repo.create(owner, payload.into()).await?;
    let row = repo.get(owner, BudgetId::new(budget.id), Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(BudgetResponse::from(row))))
}

/// GET /budgets/{id}
async fn get_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(id): PathParams<BudgetId>,
) -> Result<impl IntoResponse, ApiError> {
    let row = repo(&state).get(auth.user_id(), id, Utc::now()).await?;
    Ok(Json(BudgetResponse::from(row)))
}

/// PUT /budgets/{id}
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(id): PathParams<BudgetId>,
    ValidatedJson(payload): ValidatedJson<BudgetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = repo(&state);
    let owner = auth.user_id();
    repo.update(owner, id, payload.into()).await?;
    let row = repo.get(owner, id, Utc::now()).await?;
    Ok(Json(BudgetResponse::from(row)))
}

/// DELETE /budgets/{id}
async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(id): PathParams<BudgetId>,
) -> Result<impl IntoResponse, ApiError> {
    repo(&state).delete(auth.user_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /budgets/check - Would this expense exceed its category budget?
async fn check_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<BudgetCheckRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = repo(&state)
        .check(auth.user_id(), payload.category_id, payload.amount, Utc::now())
        .await?;
    Ok(Json(BudgetCheckResponse::from(result)))
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode};
    use rstest::rstest;
    use serde_json::{Value, json};

    use rust_decimal::Decimal;

    use super::BudgetRequest;
    use crate::test_support::{app_with_user, send};

    async fn create_category(app: &Router, token: &str, name: &str) -> Value {
        let (_, category) = send(
            app,
            "POST",
            "/api/v1/categories",
            Some(token),
            Some(json!({ "name": name })),
        )
        .await;
        category["id"].clone()
    }

    #[rstest]
    #[case("monthly", true)]
    #[case("annual", true)]
    #[case("weekly", false)]
    #[case("Monthly", false)]
    fn test_criteria_parsing(#[case] criteria: &str, #[case] accepted: bool) {
        let body = json!({ "category_id": 1, "amount": "100", "criteria": criteria });
        assert_eq!(
            serde_json::from_value::<BudgetRequest>(body).is_ok(),
            accepted
        );
    }

    #[tokio::test]
    async fn test_budget_reports_spend() {
        let (app, _, token) = app_with_user("budget@example.com").await;
        let food = create_category(&app, &token, "Food").await;

        let (status, budget) = send(
            &app,
            "POST",
            "/api/v1/budgets",
            Some(&token),
            Some(json!({ "category_id": food, "amount": "500", "criteria": "monthly" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(budget["spent"], "0");

        send(
            &app,
            "POST",
            "/api/v1/transactions",
            Some(&token),
            Some(json!({ "name": "Groceries", "amount": "-150", "category_id": food })),
        )
        .await;

        let uri = format!("/api/v1/budgets/{}", budget["id"]);
        let (status, budget) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(budget["category_name"], "Food");
        assert_eq!(budget["amount"], "500.00");
        assert_eq!(budget["spent"], "150.00");
        assert_eq!(budget["remaining"], "350.00");
        let percentage: Decimal = budget["percentage"].as_str().unwrap().parse().unwrap();
        assert_eq!(percentage, Decimal::from(70));
    }

    #[tokio::test]
    async fn test_check_endpoint() {
        let (app, _, token) = app_with_user("check@example.com").await;
        let food = create_category(&app, &token, "Food").await;
        send(
            &app,
            "POST",
            "/api/v1/budgets",
            Some(&token),
            Some(json!({ "category_id": food, "amount": "500", "criteria": "monthly" })),
        )
        .await;
        send(
            &app,
            "POST",
            "/api/v1/transactions",
            Some(&token),
            Some(json!({ "name": "Big shop", "amount": "-400", "category_id": food })),
        )
        .await;

        let (status, check) = send(
            &app,
            "POST",
            "/api/v1/budgets/check",
            Some(&token),
            Some(json!({ "category_id": food, "amount": "-150" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(check["exceeded"], true);
        assert_eq!(check["spent"], "400.00");
        assert_eq!(check["new_total"], "550.00");
        assert_eq!(check["budget"], "500.00");

        let (_, income) = send(
            &app,
            "POST",
            "/api/v1/budgets/check",
            Some(&token),
            Some(json!({ "category_id": food, "amount": "150" })),
        )
        .await;
        assert_eq!(income, json!({ "exceeded": false }));
    }

    #[tokio::test]
    async fn test_unknown_criteria_is_rejected() {
        let (app, _, token) = app_with_user("criteria@example.com").await;
        let food = create_category(&app, &token, "Food").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/budgets",
            Some(&token),
            Some(json!({ "category_id": food, "amount": "500", "criteria": "weekly" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }
}
