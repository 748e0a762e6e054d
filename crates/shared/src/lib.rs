//! Shared types, errors, and configuration for Fintrack.
//!
//! This crate provides common types used across all other crates:
//! - Money amounts with two-decimal precision
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token service

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;
pub mod validation;


pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
