//! Repetition rules.

use serde::{Deserialize, Serialize};

use super::error::ScheduleError;

/// How often a scheduled transaction repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Repetition {
    /// Every calendar month.
    #[serde(rename = "monthly")]
    Monthly,
    /// Every three calendar months.
    #[serde(rename = "3 months")]
    Quarterly,
    /// Every six calendar months.
    #[serde(rename = "6 months")]
    SemiAnnually,
    /// Every calendar year.
    #[serde(rename = "annually")]
    Annually,
}

impl Repetition {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "3 months",
            Self::SemiAnnually => "6 months",
            Self::Annually => "annually",
        }
    }

    /// Number of calendar months between occurrences.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::SemiAnnually => 6,
            Self::Annually => 12,
        }
    }
}

impl std::fmt::Display for Repetition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Repetition {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "3 months" => Ok(Self::Quarterly),
            "6 months" => Ok(Self::SemiAnnually),
            "annually" => Ok(Self::Annually),
            other => Err(ScheduleError::UnknownRepetition(other.to_string())),
        }
    }
}
