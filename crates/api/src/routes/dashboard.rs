//! Dashboard route.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use chrono::Utc;
use fintrack_core::dashboard::PeriodSummary;
use fintrack_db::{DashboardRepository, repositories::DashboardStats};
use rust_decimal::Decimal;
use serde::Serialize;

use super::accounts::AccountResponse;
use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/stats", get(get_stats))
}

/// Response for dashboard stats.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Current month totals.
    #[serde(flatten)]
    pub summary: PeriodSummary,
    /// Per-account balances.
    pub accounts: Vec<AccountResponse>,
    /// Sum of account balances.
    pub total_account_balance: Decimal,
}

impl From<DashboardStats> for DashboardResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            summary: stats.summary,
            accounts: stats
                .accounts
                .into_iter()
                .map(AccountResponse::from)
                .collect(),
            total_account_balance: stats.total_account_balance,
        }
    }
}

/// GET /dashboard/stats - Totals for the current UTC month.
async fn get_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let stats = DashboardRepository::new((*state.db).clone())
        .stats(auth.user_id(), Utc::now())
        .await?;
    Ok(Json(DashboardResponse::from(stats)))
}
