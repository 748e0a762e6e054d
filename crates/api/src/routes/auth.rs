//! Authentication routes for register, login and the current user.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use fintrack_core::auth::{hash_password, verify_password};
use fintrack_db::{UserRepository, entities::users, repositories::UserError};
use fintrack_shared::{
    AppError,
    auth::{LoginRequest, LoginResponse, RegisterRequest, UserInfo},
    types::UserId,
};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, error::ApiError, extractors::ValidatedJson, middleware::AuthUser};

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Auth routes that need a valid token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

fn user_info(user: users::Model) -> UserInfo {
    UserInfo {
        id: UserId::new(user.id),
        name: user.name,
        email: user.email,
        created_at: user.created_at,
    }
}

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        AppError::Internal("Failed to process password".to_string())
    })?;

    let user = UserRepository::new((*state.db).clone())
        .create(&payload.name, &payload.email, &password_hash)
        .await?;

    info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(json!({ "user": user_info(user) }))))
}

/// POST /auth/login - Authenticate and return an access token.
///
/// Unknown email and wrong password are indistinguishable to the caller.
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = UserRepository::new((*state.db).clone())
        .find_by_email(&payload.email)
        .await
        .map_err(UserError::from)?;

    let Some(user) = user else {
        info!("Login attempt for unknown email");
        return Err(AppError::Unauthorized.into());
    };

    let valid = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, "Password verification error");
        AppError::Unauthorized
    })?;
    if !valid {
        info!(user_id = user.id, "Failed login attempt");
        return Err(AppError::Unauthorized.into());
    }

    let access_token = state
        .jwt_service
        .generate_access_token(UserId::new(user.id), &user.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.jwt_service.access_token_expires_in(),
        user: user_info(user),
    }))
}

/// GET /auth/me - The authenticated user.
async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = UserRepository::new((*state.db).clone())
        .find_by_id(auth.user_id())
        .await
        .map_err(UserError::from)?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(json!({ "user": user_info(user) })))
}
