//! Dashboard metrics.
//!
//! This module provides the monthly income/expense summary shown on the
//! dashboard.

pub mod service;
pub mod types;

pub use service::DashboardService;
pub use types::*;
