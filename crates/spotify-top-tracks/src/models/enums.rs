//! Enumerations for query parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Listening window for a user's top items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Roughly the last four weeks.
    #[default]
    #[serde(alias = "short_term")]
    Short,
    /// Roughly the last six months.
    #[serde(alias = "medium_term")]
    Medium,
    /// Several years of history.
    #[serde(alias = "long_term")]
    Long,
}

impl TimeRange {
    /// All ranges, in the order the frontend shows its buttons.
    pub const ALL: [Self; 3] = [Self::Short, Self::Medium, Self::Long];

    /// Value for the Web API `time_range` parameter.
    #[must_use]
    pub const fn as_api_str(self) -> &'static str {
        match self {
            Self::Short => "short_term",
            Self::Medium => "medium_term",
            Self::Long => "long_term",
        }
    }

    /// Human label used in headings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Short => "Last 4 Weeks",
            Self::Medium => "Last 6 Months",
            Self::Long => "All Time",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        };
        f.write_str(name)
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" | "short_term" => Ok(Self::Short),
            "medium" | "medium_term" => Ok(Self::Medium),
            "long" | "long_term" => Ok(Self::Long),
            other => Err(format!("unknown time range '{other}' (expected short, medium or long)")),
        }
    }
}
