//! Transaction routes.
//!
//! Writes keep the linked account balance in step with the transaction.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use fintrack_db::{
    TransactionRepository,
    entities::transactions,
    repositories::{TransactionFilter, TransactionInput, TransactionWithCategory},
};
use fintrack_shared::types::{AccountId, Amount, CategoryId, TransactionId};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::{
    AppState,
    error::ApiError,
    extractors::{PathParams, QueryParams, ValidatedJson},
    middleware::AuthUser,
};

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by category.
    pub category_id: Option<CategoryId>,
    /// Filter by account.
    pub account_id: Option<AccountId>,
}

/// Request body for creating or replacing a transaction.
#[derive(Debug, Deserialize, Validate)]
pub struct TransactionRequest {
    /// Description.
    #[validate(
        length(max = 255, message = "name is too long"),
        custom(function = "fintrack_shared::validation::not_blank", message = "name is required")
    )]
    pub name: String,
    /// Signed amount. Positive is income.
    pub amount: Amount,
    /// Optional category.
    pub category_id: Option<CategoryId>,
    /// Optional account.
    pub account_id: Option<AccountId>,
}

impl From<TransactionRequest> for TransactionInput {
    fn from(req: TransactionRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            amount: req.amount,
            category_id: req.category_id,
            account_id: req.account_id,
        }
    }
}

/// Response for a transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: TransactionId,
    /// Description.
    pub name: String,
    /// Signed amount.
    pub amount: Amount,
    /// Category ID.
    pub category_id: Option<CategoryId>,
    /// Category name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Account ID.
    pub account_id: Option<AccountId>,
    /// Created at timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(model: transactions::Model) -> Self {
        Self {
            id: TransactionId::new(model.id),
            name: model.name,
            amount: Amount::from_cents(model.amount_cents),
            category_id: model.category_id.map(CategoryId::new),
            category_name: None,
            account_id: model.account_id.map(AccountId::new),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<TransactionWithCategory> for TransactionResponse {
    fn from(row: TransactionWithCategory) -> Self {
        Self {
            category_name: row.category_name,
            ..Self::from(row.transaction)
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

fn repo(state: &AppState) -> TransactionRepository {
    TransactionRepository::new((*state.db).clone())
}

/// GET /transactions - Newest first, optionally filtered.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<ListTransactionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = TransactionFilter {
        category_id: query.category_id,
        account_id: query.account_id,
    };
    let rows = repo(&state).list(auth.user_id(), filter).await?;
    Ok(Json(
        rows.into_iter()
            .map(TransactionResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// POST /transactions
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<TransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let model = repo(&state)
        .create(auth.user_id(), payload.into())
        .await?;

    info!(
        transaction_id = model.id,
        user_id = %auth.user_id(),
        "Transaction created"
    );

    Ok((StatusCode::CREATED, Json(TransactionResponse::from(model))))
}

/// GET /transactions/{id}
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(id): PathParams<TransactionId>,
) -> Result<impl IntoResponse, ApiError> {
    let row = repo(&state).get(auth.user_id(), id).await?;
    Ok(Json(TransactionResponse::from(row)))
}

/// PUT /transactions/{id} - Replaces every field.
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(id): PathParams<TransactionId>,
    ValidatedJson(payload): ValidatedJson<TransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let model = repo(&state)
        .update(auth.user_id(), id, payload.into())
        .await?;

    info!(transaction_id = model.id, "Transaction updated");

    Ok(Json(TransactionResponse::from(model)))
}

/// DELETE /transactions/{id}
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(id): PathParams<TransactionId>,
) -> Result<impl IntoResponse, ApiError> {
    repo(&state).delete(auth.user_id(), id).await?;

    info!(transaction_id = %id, "Transaction deleted");

    Ok(StatusCode::NO_CONTENT)
}
