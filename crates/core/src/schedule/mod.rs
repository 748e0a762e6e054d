//! Scheduled transaction repetition.
//!
//! A scheduled transaction is due once its `repeat_at` is not in the future.
//! Processing materializes one concrete transaction and moves `repeat_at`
//! forward by whole calendar months.

pub mod error;
pub mod service;
pub mod types;

pub use error::ScheduleError;
pub use service::ScheduleService;
pub use types::Repetition;
