//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every read and write is scoped to an owning user.

pub mod account;
pub mod budget;
pub mod category;
pub mod dashboard;
pub mod ledger;
pub mod scheduled;
pub mod transaction;
pub mod user;

pub use account::{AccountError, AccountRepository, CreateAccountInput};
pub use budget::{
    BudgetCheckResult, BudgetError, BudgetInput, BudgetRepository, BudgetWithSpend,
};
pub use category::{CategoryError, CategoryRepository};
pub use dashboard::{DashboardError, DashboardRepository, DashboardStats};
pub use ledger::{Ledger, TransactionError, TransactionInput};
pub use scheduled::{
    ProcessOutcome, ScheduledError, ScheduledTransactionInput, ScheduledTransactionRepository,
};
pub use transaction::{TransactionFilter, TransactionRepository, TransactionWithCategory};
pub use user::{UserError, UserRepository};
