//! `SeaORM` entity definitions.
//!
//! Money columns hold signed minor units (cents).

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod scheduled_transactions;
pub mod transactions;
pub mod users;
