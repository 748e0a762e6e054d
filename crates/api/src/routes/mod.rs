//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod accounts;
pub mod auth;
pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod health;
pub mod scheduled;
pub mod transactions;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(categories::routes())
        .merge(accounts::routes())
        .merge(transactions::routes())
        .merge(budgets::routes())
        .merge(scheduled::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
