//! Units accepted for the report period

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LoadgridError;

/// Time unit of a report period, parsed case-insensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    #[default]
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 7] = [
        Self::Nanoseconds,
        Self::Microseconds,
        Self::Milliseconds,
        Self::Seconds,
        Self::Minutes,
        Self::Hours,
        Self::Days,
    ];

    /// Convert `amount` of this unit to whole milliseconds, truncating
    /// sub-millisecond remainders. `None` on overflow.
    pub fn to_millis(&self, amount: i64) -> Option<i64> {
        match self {
            Self::Nanoseconds => Some(amount / 1_000_000),
            Self::Microseconds => Some(amount / 1_000),
            Self::Milliseconds => Some(amount),
            Self::Seconds => amount.checked_mul(1_000),
            Self::Minutes => amount.checked_mul(60_000),
            Self::Hours => amount.checked_mul(3_600_000),
            Self::Days => amount.checked_mul(86_400_000),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nanoseconds => "NANOSECONDS",
            Self::Microseconds => "MICROSECONDS",
            Self::Milliseconds => "MILLISECONDS",
            Self::Seconds => "SECONDS",
            Self::Minutes => "MINUTES",
            Self::Hours => "HOURS",
            Self::Days => "DAYS",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = LoadgridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|unit| unit.as_str() == wanted)
            .ok_or_else(|| {
                LoadgridError::invalid_argument(
                    "timeUnit",
                    format!("No time unit named '{}'", s.trim()),
                )
            })
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
