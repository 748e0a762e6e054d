//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fintrack_shared::AppError;
use serde_json::json;
use tracing::error;

/// Handler error rendered as `{"error": code, "message": text}`.
///
/// Anything convertible into [`AppError`] converts into this, so handlers
/// can use `?` on repository results directly.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = match &self.0 {
            AppError::Unauthorized => "Authentication required".to_string(),
            AppError::NotFound(msg) | AppError::Validation(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            AppError::Database(_) | AppError::Internal(_) => {
                error!(error = %self.0, "Request failed");
                "An internal error occurred".to_string()
            }
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(error).into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_client_errors() {
        let cases = [
            (AppError::NotFound("Budget not found: 3".into()), 404, "not_found"),
            (AppError::Validation("bad".into()), 400, "validation_error"),
            (AppError::Conflict("Email already registered".into()), 400, "conflict"),
            (AppError::Unauthorized, 401, "unauthorized"),
        ];

        for (error, status, code) in cases {
            let (actual, body) = render(error).await;
            assert_eq!(actual.as_u16(), status);
            assert_eq!(body["error"], code);
        }
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let (status, body) = render(AppError::Database("connection reset".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_client_error_message_is_passed_through() {
        let (_, body) = render(AppError::NotFound("Budget not found: 3".into())).await;
        assert_eq!(body["message"], "Budget not found: 3");
    }
}
