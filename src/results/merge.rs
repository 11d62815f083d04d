//! Mergeable benchmark result data
//!
//! Partial aggregates computed on different shards or pages are combined
//! pairwise. Only aggregates of exactly the same kind may be combined.

use crate::error::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind of object a throughput figure counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultObjectType {
    Document,
    Folder,
    Site,
    User,
    Other,
}

impl fmt::Display for ResultObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Document => "Document",
            Self::Folder => "Folder",
            Self::Site => "Site",
            Self::User => "User",
            Self::Other => "Other",
        };
        f.write_str(name)
    }
}

/// Why two aggregates could not be combined
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MergeError {
    #[error("Data objects must have the same object type! ({left} vs {right})")]
    CategoryMismatch {
        left: ResultObjectType,
        right: ResultObjectType,
    },

    #[error("Data objects must have the same descriptive type! ('{left}' vs '{right}')")]
    DescriptionMismatch { left: String, right: String },

    #[error("'objectsPerSecond' must be a positive value, got {0}")]
    InvalidValue(f64),
}

impl MergeError {
    /// Name of the field that prevented the merge
    pub fn field(&self) -> &'static str {
        match self {
            Self::CategoryMismatch { .. } => "category",
            Self::DescriptionMismatch { .. } => "description",
            Self::InvalidValue(_) => "value",
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::CategoryMismatch { .. } => ErrorCode::MERGE_CATEGORY_MISMATCH,
            Self::DescriptionMismatch { .. } => ErrorCode::MERGE_DESCRIPTION_MISMATCH,
            Self::InvalidValue(_) => ErrorCode::MERGE_INVALID_VALUE,
        }
    }
}

/// Common header of benchmark result data
pub trait ResultData {
    fn description(&self) -> &str;

    /// One-line rendering for logs and reports
    fn summary(&self) -> String;
}

/// Aggregate values that can be combined with another of the same kind
pub trait Mergeable: Sized {
    fn combine(&self, other: &Self) -> Result<Self, MergeError>;
}

/// Throughput of one kind of object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawObjectsPerSecond")]
pub struct ObjectsPerSecond {
    value: f64,
    category: ResultObjectType,
    description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawObjectsPerSecond {
    value: f64,
    category: ResultObjectType,
    description: String,
}

impl TryFrom<RawObjectsPerSecond> for ObjectsPerSecond {
    type Error = MergeError;

    fn try_from(raw: RawObjectsPerSecond) -> Result<Self, Self::Error> {
        Self::new(raw.value, raw.category, raw.description)
    }
}

impl ObjectsPerSecond {
    /// Rejects negative and non-finite values
    pub fn new(
        value: f64,
        category: ResultObjectType,
        description: impl Into<String>,
    ) -> Result<Self, MergeError> {
        if !value.is_finite() || value < 0.0 {
            return Err(MergeError::InvalidValue(value));
        }
        Ok(Self {
            value,
            category,
            description: description.into(),
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn category(&self) -> ResultObjectType {
        self.category
    }
}

impl ResultData for ObjectsPerSecond {
    fn description(&self) -> &str {
        &self.description
    }

    fn summary(&self) -> String {
        format!(
            "ObjectsPerSecondResultData [objectsPerSecond={}, objectType={}, description={}]",
            self.value, self.category, self.description
        )
    }
}

impl Mergeable for ObjectsPerSecond {
    /// Mean of the two values; category and description must match exactly
    fn combine(&self, other: &Self) -> Result<Self, MergeError> {
        if self.category != other.category {
            return Err(MergeError::CategoryMismatch {
                left: self.category,
                right: other.category,
            });
        }
        if self.description != other.description {
            return Err(MergeError::DescriptionMismatch {
                left: self.description.clone(),
                right: other.description.clone(),
            });
        }
        Ok(Self {
            value: (self.value + other.value) / 2.0,
            category: self.category,
            description: self.description.clone(),
        })
    }
}

/// Combine two aggregates of the same kind
pub fn combine<T: Mergeable>(a: &T, b: &T) -> Result<T, MergeError> {
    a.combine(b)
}
