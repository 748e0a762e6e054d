//! Category routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use fintrack_db::{CategoryRepository, entities::categories};
use fintrack_shared::types::CategoryId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    AppState,
    error::ApiError,
    extractors::{PathParams, ValidatedJson},
    middleware::AuthUser,
};

/// Creates the category routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

/// Request body for creating or renaming a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    /// Category name.
    #[validate(
        length(max = 255, message = "name is too long"),
        custom(function = "fintrack_shared::validation::not_blank", message = "name is required")
    )]
    pub name: String,
}

/// Response for a category.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    /// Category ID.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// Created at timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<categories::Model> for CategoryResponse {
    fn from(model: categories::Model) -> Self {
        Self {
            id: CategoryId::new(model.id),
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn repo(state: &AppState) -> CategoryRepository {
    CategoryRepository::new((*state.db).clone())
}

/// GET /categories
async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let categories = repo(&state).list(auth.user_id()).await?;
    Ok(Json(
        categories
            .into_iter()
            .map(CategoryResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// POST /categories
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let category = repo(&state).create(auth.user_id(), &payload.name).await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

/// GET /categories/{id}
async fn get_category(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(id): PathParams<CategoryId>,
) -> Result<impl IntoResponse, ApiError> {
    let category = repo(&state).get(auth.user_id(), id).await?;
    Ok(Json(CategoryResponse::from(category)))
}

/// PUT /categories/{id}
async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(id): PathParams<CategoryId>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let category = repo(&state)
        .update(auth.user_id(), id, &payload.name)
        .await?;
    Ok(Json(CategoryResponse::from(category)))
}

/// DELETE /categories/{id}
async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(id): PathParams<CategoryId>,
) -> Result<impl IntoResponse, ApiError> {
    repo(&state).delete(auth.user_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::{app_with_user, send, user_token};

    #[tokio::test]
    async fn test_category_crud() {
        let (app, _, token) = app_with_user("cat@example.com").await;

        let (status, food) = send(
            &app,
            "POST",
            "/api/v1/categories",
            Some(&token),
            Some(json!({ "name": "Food" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = food["id"].as_i64().unwrap();

        send(
            &app,
            "POST",
            "/api/v1/categories",
            Some(&token),
            Some(json!({ "name": "Bills" })),
        )
        .await;

        let (_, list) = send(&app, "GET", "/api/v1/categories", Some(&token), None).await;
        let names: Vec<_> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Bills", "Food"]);

        let uri = format!("/api/v1/categories/{id}");
        let (status, renamed) = send(
            &app,
            "PUT",
            &uri,
            Some(&token),
            Some(json!({ "name": "Groceries" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(renamed["name"], "Groceries");

        let (status, body) = send(&app, "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        let (status, body) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_other_users_category_is_not_found() {
        let (app, state, token) = app_with_user("owner@example.com").await;
        let intruder = user_token(&state, "intruder@example.com").await;

        let (_, created) = send(
            &app,
            "POST",
            "/api/v1/categories",
            Some(&token),
            Some(json!({ "name": "Private" })),
        )
        .await;
        let uri = format!("/api/v1/categories/{}", created["id"]);

        let (status, _) = send(&app, "GET", &uri, Some(&intruder), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, list) = send(&app, "GET", "/api/v1/categories", Some(&intruder), None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let (app, _, token) = app_with_user("blank@example.com").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/categories",
            Some(&token),
            Some(json!({ "name": "" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }
}
