//! Schedule error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors for repetition parsing and date projection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// Repetition string is not one of the supported rules.
    #[error("unknown repetition: {0}")]
    UnknownRepetition(String),

    /// Advancing the date left chrono's supported range.
    #[error("next occurrence after {0} is out of range")]
    DateOutOfRange(DateTime<Utc>),
}
