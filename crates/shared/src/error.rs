//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed. Carries no detail on purpose.
    #[error("Authentication failed")]
    Unauthorized,

    /// Resource not found or not owned by the caller.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict (e.g., duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    ///
    /// Conflicts surface as 400 so that a duplicate registration looks
    /// like any other rejected input.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::NotFound(_) => 404,
            Self::Validation(_) | Self::Conflict(_) => 400,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation_error",
            Self::Conflict(_) => "conflict",
            Self::Database(_) => "database_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Returns true for errors whose detail must not reach the client.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Unauthorized.status_code(), 401);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 400);
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::Unauthorized.error_code(), "unauthorized");
        assert_eq!(AppError::NotFound(String::new()).error_code(), "not_found");
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "validation_error"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "conflict");
        assert_eq!(
            AppError::Database(String::new()).error_code(),
            "database_error"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "internal_error"
        );
    }

    #[test]
    fn test_server_errors() {
        assert!(AppError::Database("boom".into()).is_server_error());
        assert!(AppError::Internal("boom".into()).is_server_error());
        assert!(!AppError::Conflict("dup".into()).is_server_error());
        assert!(!AppError::Unauthorized.is_server_error());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(AppError::Unauthorized.to_string(), "Authentication failed");
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::Conflict("msg".into()).to_string(),
            "Conflict: msg"
        );
    }
}
