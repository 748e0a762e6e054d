//! Authentication types for JWT and request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::UserId;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user.
    pub user_id: UserId,
    /// User email at issue time.
    pub email: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: UserId, email: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            email: email.to_string(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(
        length(max = 255, message = "name is too long"),
        custom(function = "crate::validation::not_blank", message = "name is required")
    )]
    pub name: String,
    /// User email.
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    /// Plain-text password.
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// User email.
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    /// User password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Signed access token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    /// Authenticated user info.
    pub user: UserInfo,
}

/// User info returned in auth responses. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User email.
    pub email: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}
