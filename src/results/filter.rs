//! Success/failure filter for the raw event detail view

use super::ResultRecord;
use crate::error::LoadgridError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which records the detail view returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventResultFilter {
    #[default]
    All,
    Success,
    Failed,
}

impl EventResultFilter {
    pub fn matches(&self, record: &ResultRecord) -> bool {
        match self {
            Self::All => true,
            Self::Success => record.success,
            Self::Failed => !record.success,
        }
    }
}

impl FromStr for EventResultFilter {
    type Err = LoadgridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "success" => Ok(Self::Success),
            "failed" | "failure" => Ok(Self::Failed),
            other => Err(LoadgridError::invalid_argument(
                "filterSuccess",
                format!("'{other}' is not one of All, Success, Failed"),
            )),
        }
    }
}

impl fmt::Display for EventResultFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Success => write!(f, "Success"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}
