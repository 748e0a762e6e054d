//! Scheduled transaction routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use fintrack_core::schedule::Repetition;
use fintrack_db::{
    ScheduledTransactionRepository, entities::scheduled_transactions,
    repositories::ScheduledTransactionInput,
};
use fintrack_shared::types::{AccountId, Amount, CategoryId, ScheduledTransactionId};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    AppState,
    error::ApiError,
    extractors::{PathParams, ValidatedJson},
    middleware::AuthUser,
};

/// Creates the scheduled transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/scheduled", get(list_scheduled).post(create_scheduled))
        .route("/scheduled/process", post(process_scheduled))
        .route(
            "/scheduled/{id}",
            get(get_scheduled)
                .put(update_scheduled)
                .delete(delete_scheduled),
        )
}

/// Request body for creating or replacing a scheduled transaction.
#[derive(Debug, Deserialize, Validate)]
pub struct ScheduledRequest {
    /// Name copied onto each generated transaction.
    #[validate(
        length(max = 255, message = "name is too long"),
        custom(function = "fintrack_shared::validation::not_blank", message = "name is required")
    )]
    pub name: String,
    /// Signed amount.
    pub amount: Amount,
    /// `monthly`, `3 months`, `6 months` or `annually`.
    pub repetition: Repetition,
    /// Next due time.
    pub repeat_at: DateTime<Utc>,
    /// Optional category.
    pub category_id: Option<CategoryId>,
    /// Optional account.
    pub account_id: Option<AccountId>,
}

impl From<ScheduledRequest> for ScheduledTransactionInput {
    fn from(req: ScheduledRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            amount: req.amount,
            repetition: req.repetition,
            repeat_at: req.repeat_at,
            category_id: req.category_id,
            account_id: req.account_id,
        }
    }
}

/// Response for a scheduled transaction.
#[derive(Debug, Serialize)]
pub struct ScheduledResponse {
    /// Scheduled transaction ID.
    pub id: ScheduledTransactionId,
    /// Name.
    pub name: String,
    /// Signed amount.
    pub amount: Amount,
    /// Repetition rule as stored.
    pub repetition: String,
    /// Next due time.
    pub repeat_at: DateTime<Utc>,
    /// Category ID.
    pub category_id: Option<CategoryId>,
    /// Account ID.
    pub account_id: Option<AccountId>,
    /// Created at timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<scheduled_transactions::Model> for ScheduledResponse {
    fn from(model: scheduled_transactions::Model) -> Self {
        Self {
            id: ScheduledTransactionId::new(model.id),
            name: model.name,
            amount: Amount::from_cents(model.amount_cents),
            repetition: model.repetition,
            repeat_at: model.repeat_at,
            category_id: model.category_id.map(CategoryId::new),
            account_id: model.account_id.map(AccountId::new),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Response for a processing run.
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    /// Items that produced a transaction.
    pub processed: u64,
    /// Items that failed and were left for a later run.
    pub failed: u64,
}

fn repo(state: &AppState) -> ScheduledTransactionRepository {
    ScheduledTransactionRepository::new((*state.db).clone())
}

/// GET /scheduled - Soonest first.
async fn list_scheduled(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let rows = repo(&state).list(auth.user_id()).await?;
    Ok(Json(
        rows.into_iter()
            .map(ScheduledResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// POST /scheduled
async fn create_scheduled(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<ScheduledRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let model = repo(&state)
        .create(auth.user_id(), &payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ScheduledResponse::from(model))))
}

/// GET /scheduled/{id}
async fn get_scheduled(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(id): PathParams<ScheduledTransactionId>,
) -> Result<impl IntoResponse, ApiError> {
    let model = repo(&state).get(auth.user_id(), id).await?;
    Ok(Json(ScheduledResponse::from(model)))
}

/// PUT /scheduled/{id}
async fn update_scheduled(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(id): PathParams<ScheduledTransactionId>,
    ValidatedJson(payload): ValidatedJson<ScheduledRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let model = repo(&state)
        .update(auth.user_id(), id, &payload.into())
        .await?;
    Ok(Json(ScheduledResponse::from(model)))
}

/// DELETE /scheduled/{id}
async fn delete_scheduled(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(id): PathParams<ScheduledTransactionId>,
) -> Result<impl IntoResponse, ApiError> {
    repo(&state).delete(auth.user_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /scheduled/process - Materialize everything due now.
async fn process_scheduled(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = repo(&state)
        .process_due(auth.user_id(), Utc::now())
        .await?;
    Ok(Json(ProcessResponse {
        processed: outcome.processed,
        failed: outcome.failed,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{Duration, Months, SubsecRound, Utc};
    use serde_json::json;

    use crate::test_support::{app_with_user, send};

    #[tokio::test]
    async fn test_process_due_item() {
        let (app, _, token) = app_with_user("sched@example.com").await;
        let due = (Utc::now() - Duration::hours(1)).trunc_subsecs(0);

        let (status, item) = send(
            &app,
            "POST",
            "/api/v1/scheduled",
            Some(&token),
            Some(json!({
                "name": "Rent",
                "amount": "-1200",
                "repetition": "monthly",
                "repeat_at": due,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(item["repetition"], "monthly");

        let (status, outcome) =
            send(&app, "POST", "/api/v1/scheduled/process", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["processed"], 1);

        let (_, again) = send(&app, "POST", "/api/v1/scheduled/process", Some(&token), None).await;
        assert_eq!(again["processed"], 0);

        let uri = format!("/api/v1/scheduled/{}", item["id"]);
        let (_, item) = send(&app, "GET", &uri, Some(&token), None).await;
        let expected = due.checked_add_months(Months::new(1)).unwrap();
        assert_eq!(item["repeat_at"], json!(expected));

        let (_, transactions) = send(&app, "GET", "/api/v1/transactions", Some(&token), None).await;
        assert_eq!(transactions[0]["name"], "Rent");
        assert_eq!(transactions[0]["amount"], "-1200.00");
    }

    #[tokio::test]
    async fn test_unknown_repetition_is_rejected() {
        let (app, _, token) = app_with_user("weekly@example.com").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/scheduled",
            Some(&token),
            Some(json!({
                "name": "Gym",
                "amount": "-30",
                "repetition": "weekly",
                "repeat_at": Utc::now(),
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (app, _, token) = app_with_user("edit@example.com").await;
        let later = Utc::now() + Duration::days(10);
        let (_, item) = send(
            &app,
            "POST",
            "/api/v1/scheduled",
            Some(&token),
            Some(json!({
                "name": "Insurance",
                "amount": "-90",
                "repetition": "6 months",
                "repeat_at": later,
            })),
        )
        .await;
        let uri = format!("/api/v1/scheduled/{}", item["id"]);

        let (status, updated) = send(
            &app,
            "PUT",
            &uri,
            Some(&token),
            Some(json!({
                "name": "Insurance",
                "amount": "-95",
                "repetition": "annually",
                "repeat_at": later,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["repetition"], "annually");
        assert_eq!(updated["amount"], "-95.00");

        let (_, outcome) = send(&app, "POST", "/api/v1/scheduled/process", Some(&token), None).await;
        assert_eq!(outcome["processed"], 0);

        let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
