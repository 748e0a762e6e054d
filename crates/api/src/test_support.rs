//! Helpers for router tests against an in-memory database.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use fintrack_db::{UserRepository, migration::Migrator};
use fintrack_shared::{JwtService, config::JwtConfig, types::UserId};
use http_body_util::BodyExt;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::{AppState, create_router};

pub const TEST_SECRET: &str = "test-secret-that-is-at-least-32-bytes-long";

pub fn jwt_service() -> JwtService {
    JwtService::new(&JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_token_expiry_secs: 3600,
    })
}

pub async fn test_state() -> AppState {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service()),
    }
}

/// Router plus a registered user's bearer token.
pub async fn app_with_user(email: &str) -> (Router, AppState, String) {
    let state = test_state().await;
    let token = user_token(&state, email).await;
    (create_router(state.clone()), state, token)
}

pub async fn user_token(state: &AppState, email: &str) -> String {
    let user = UserRepository::new((*state.db).clone())
        .create("Test User", email, "not-a-real-hash")
        .await
        .expect("Failed to create user");
    state
        .jwt_service
        .generate_access_token(UserId::new(user.id), &user.email)
        .expect("Failed to generate token")
}

/// Sends one request and returns the status with the JSON body (`Null` if empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
