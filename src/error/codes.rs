/// Error code registry for loadgrid
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 2000-2999: Scheduler errors
/// - 3000-3999: Storage errors
/// - 4000-4999: Query errors
/// - 5000-5999: Merge errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_PARSE_ERROR: u16 = 1002;
    pub const CONFIG_MISSING_REQUIRED: u16 = 1004;
    pub const CONFIG_INVALID_VALUE: u16 = 1005;

    // Scheduler errors (2000-2999)
    pub const SCHEDULER_INVALID_INBOUND: u16 = 2001;
    pub const SCHEDULER_TIME_OVERFLOW: u16 = 2002;

    // Storage errors (3000-3999)
    pub const STORAGE_IO_ERROR: u16 = 3001;
    pub const STORAGE_BACKEND_ERROR: u16 = 3010;
    pub const STORAGE_SERIALIZATION_ERROR: u16 = 3011;

    // Query errors (4000-4999)
    pub const QUERY_INVALID_ARGUMENT: u16 = 4001;
    pub const QUERY_DATA_CONSISTENCY: u16 = 4002;

    // Merge errors (5000-5999)
    pub const MERGE_CATEGORY_MISMATCH: u16 = 5001;
    pub const MERGE_DESCRIPTION_MISMATCH: u16 = 5002;
    pub const MERGE_INVALID_VALUE: u16 = 5003;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        ErrorCode::CONFIG_GENERIC => "General configuration error",
        ErrorCode::CONFIG_NOT_FOUND => "Configuration file not found",
        ErrorCode::CONFIG_PARSE_ERROR => "Configuration file could not be parsed",
        ErrorCode::CONFIG_MISSING_REQUIRED => "Required configuration section is missing",
        ErrorCode::CONFIG_INVALID_VALUE => "Configuration value is out of range",

        ErrorCode::SCHEDULER_INVALID_INBOUND => "Scheduler received a payload it did not emit",
        ErrorCode::SCHEDULER_TIME_OVERFLOW => "Scheduled time exceeded the representable range",

        ErrorCode::STORAGE_IO_ERROR => "Result store I/O failed",
        ErrorCode::STORAGE_BACKEND_ERROR => "Result store backend error",
        ErrorCode::STORAGE_SERIALIZATION_ERROR => "Result record could not be (de)serialized",

        ErrorCode::QUERY_INVALID_ARGUMENT => "Query parameter is invalid",
        ErrorCode::QUERY_DATA_CONSISTENCY => "Stored results are inconsistent",

        ErrorCode::MERGE_CATEGORY_MISMATCH => "Aggregates have different categories",
        ErrorCode::MERGE_DESCRIPTION_MISMATCH => "Aggregates have different descriptions",
        ErrorCode::MERGE_INVALID_VALUE => "Aggregate value must be a finite, non-negative number",

        _ => "Unknown error",
    }
}
