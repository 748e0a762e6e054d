//! Bank account routes.
//!
//! The balance is read-only here. It is set once through the opening
//! balance and afterwards follows the account's transactions.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use fintrack_db::{AccountRepository, entities::accounts, repositories::CreateAccountInput};
use fintrack_shared::types::{AccountId, Amount};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    AppState,
    error::ApiError,
    extractors::{PathParams, ValidatedJson},
    middleware::AuthUser,
};

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
}

/// Request body for creating an account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    /// Bank or display name.
    #[validate(
        length(max = 255, message = "bank_name is too long"),
        custom(function = "fintrack_shared::validation::not_blank", message = "bank_name is required")
    )]
    pub bank_name: String,
    /// Opening balance, zero when omitted.
    #[serde(default)]
    pub amount: Option<Amount>,
}

/// Request body for renaming an account.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    /// New bank or display name.
    #[validate(
        length(max = 255, message = "bank_name is too long"),
        custom(function = "fintrack_shared::validation::not_blank", message = "bank_name is required")
    )]
    pub bank_name: String,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: AccountId,
    /// Bank or display name.
    pub bank_name: String,
    /// Current balance.
    pub amount: Amount,
    /// Created at timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<accounts::Model> for AccountResponse {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: AccountId::new(model.id),
            bank_name: model.bank_name,
            amount: Amount::from_cents(model.amount_cents),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn repo(state: &AppState) -> AccountRepository {
    AccountRepository::new((*state.db).clone())
}

/// GET /accounts
async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = repo(&state).list(auth.user_id()).await?;
    Ok(Json(
        accounts
            .into_iter()
            .map(AccountResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// POST /accounts
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = repo(&state)
        .create(
            auth.user_id(),
            CreateAccountInput {
                bank_name: payload.bank_name,
                opening_balance: payload.amount.unwrap_or(Amount::ZERO),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// GET /accounts/{id}
async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(id): PathParams<AccountId>,
) -> Result<impl IntoResponse, ApiError> {
    let account = repo(&state).get(auth.user_id(), id).await?;
    Ok(Json(AccountResponse::from(account)))
}

/// PUT /accounts/{id}
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(id): PathParams<AccountId>,
    ValidatedJson(payload): ValidatedJson<UpdateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = repo(&state)
        .rename(auth.user_id(), id, &payload.bank_name)
        .await?;
    Ok(Json(AccountResponse::from(account)))
}

/// DELETE /accounts/{id}
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(id): PathParams<AccountId>,
) -> Result<impl IntoResponse, ApiError> {
    repo(&state).delete(auth.user_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
