//! Core business logic for Fintrack.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Account balance consistency planning
//! - `budget` - Period-scoped budget spend and limit checks
//! - `schedule` - Recurring transaction repetition rules
//! - `dashboard` - Monthly income/expense summaries
//! - `period` - Calendar month and year windows
//! - `auth` - Password hashing

pub mod auth;
pub mod budget;
pub mod dashboard;
pub mod ledger;
pub mod period;
pub mod schedule;
