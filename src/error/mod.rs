use std::error::Error as StdError;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

use crate::results::MergeError;
use crate::store::StorageError;

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, LoadgridError>;

/// The unified error type for loadgrid
#[derive(Error, Debug)]
pub enum LoadgridError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config { code: u16, message: String },

    #[error("[E{code:04}] Invalid argument: {message}")]
    InvalidArgument {
        code: u16,
        message: String,
        parameter: Option<String>,
    },

    #[error("[E{code:04}] Data consistency error: {message}")]
    DataConsistency { code: u16, message: String },

    #[error("[E{code:04}] Scheduler error: {message}")]
    Scheduler { code: u16, message: String },

    #[error("[E{code:04}] Merge error: {source}")]
    Merge {
        code: u16,
        #[source]
        source: MergeError,
    },

    #[error("[E{code:04}] Storage error: {source}")]
    Storage {
        code: u16,
        #[source]
        source: StorageError,
    },
}

impl LoadgridError {
    /// Create a configuration error with default code
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_GENERIC,
            message: message.into(),
        }
    }

    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
        }
    }

    /// Create an invalid argument error naming the offending parameter
    pub fn invalid_argument(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            code: ErrorCode::QUERY_INVALID_ARGUMENT,
            message: message.into(),
            parameter: Some(parameter.into()),
        }
    }

    /// Create a data consistency error
    pub fn data_consistency(message: impl Into<String>) -> Self {
        Self::DataConsistency {
            code: ErrorCode::QUERY_DATA_CONSISTENCY,
            message: message.into(),
        }
    }

    /// Create a scheduler error with specific code
    pub fn scheduler_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Scheduler {
            code,
            message: message.into(),
        }
    }

    /// Get the numeric error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::InvalidArgument { code, .. }
            | Self::DataConsistency { code, .. }
            | Self::Scheduler { code, .. }
            | Self::Merge { code, .. }
            | Self::Storage { code, .. } => *code,
        }
    }

    /// Whether the error was caused by caller input rather than by the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::Config { .. } | Self::Merge { .. }
        )
    }

    /// Message suitable for end users
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, .. } => format!("Configuration problem: {message}"),
            Self::InvalidArgument {
                message,
                parameter: Some(parameter),
                ..
            } => format!("Invalid value for '{parameter}': {message}"),
            Self::InvalidArgument { message, .. } => format!("Invalid argument: {message}"),
            Self::DataConsistency { message, .. } => {
                format!("The stored results are inconsistent: {message}")
            }
            Self::Scheduler { message, .. } => format!("Scheduling failed: {message}"),
            Self::Merge { source, .. } => format!("Cannot merge results: {source}"),
            Self::Storage { source, .. } => format!("Result store failure: {source}"),
        }
    }

    /// Message with the code description, for verbose output
    pub fn developer_message(&self) -> String {
        let mut out = format!(
            "{self}\n  Code: E{:04} ({})",
            self.code(),
            describe_error_code(self.code())
        );
        let mut source = StdError::source(self);
        while let Some(cause) = source {
            out.push_str(&format!("\n  Caused by: {cause}"));
            source = cause.source();
        }
        out
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 3,
            Self::InvalidArgument { .. } => 2,
            Self::Storage { .. } => 4,
            _ => 1,
        }
    }
}

impl From<MergeError> for LoadgridError {
    fn from(err: MergeError) -> Self {
        Self::Merge {
            code: err.code(),
            source: err,
        }
    }
}

impl From<StorageError> for LoadgridError {
    fn from(err: StorageError) -> Self {
        Self::Storage {
            code: err.code(),
            source: err,
        }
    }
}
