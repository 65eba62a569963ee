//! Error types for the energy statistics crate
//!
//! Covers every failure mode outside the aggregation itself:
//! - Record validation errors (non-numeric or negative generation, bad timestamps)
//! - Data source errors (HTTP status, network, malformed response body)
//! - Configuration errors (missing options, unreadable files)
//!
//! An empty record set is never an error; it aggregates to the zero state.

use std::fmt;

/// Top-level error type
///
/// Supports automatic conversion from specific error types via From trait
#[derive(Debug)]
pub enum DashboardError {
    /// A record failed validation before aggregation
    Validation(ValidationError),

    /// The data source could not deliver records
    Api(ApiError),

    /// Configuration could not be loaded or is invalid
    Config(ConfigError),

    /// Generic error with message
    Generic(String),
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Validation(e) => write!(f, "Validation error: {}", e),
            DashboardError::Api(e) => write!(f, "API error: {}", e),
            DashboardError::Config(e) => write!(f, "Config error: {}", e),
            DashboardError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DashboardError {}

impl From<ValidationError> for DashboardError {
    fn from(err: ValidationError) -> Self {
        DashboardError::Validation(err)
    }
}

impl From<ApiError> for DashboardError {
    fn from(err: ApiError) -> Self {
        DashboardError::Api(err)
    }
}

impl From<ConfigError> for DashboardError {
    fn from(err: ConfigError) -> Self {
        DashboardError::Config(err)
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Generic(format!("I/O error: {}", err))
    }
}

impl From<String> for DashboardError {
    fn from(msg: String) -> Self {
        DashboardError::Generic(msg)
    }
}

impl From<&str> for DashboardError {
    fn from(msg: &str) -> Self {
        DashboardError::Generic(msg.to_string())
    }
}

/// Record validation errors
///
/// Every variant that concerns a single record carries the record's position
/// in the input sequence and the offending field name, so the caller can point
/// at the exact cell that failed.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value is present but not a number
    ///
    /// Example: `"actual_generation_mw": "12,5 MW"`
    NotANumber {
        record: usize,
        field: &'static str,
        value: String,
    },

    /// Value is a number but NaN or infinite
    NonFinite {
        record: usize,
        field: &'static str,
        value: f64,
    },

    /// Generation cannot be negative
    Negative {
        record: usize,
        field: &'static str,
        value: f64,
    },

    /// Required field is absent or null
    ///
    /// Example: record without `timestamp`
    MissingField { record: usize, field: &'static str },

    /// Field has the wrong JSON type
    ///
    /// Example: `"resource_type": 42`
    WrongType {
        record: usize,
        field: &'static str,
        expected: &'static str,
    },

    /// Timestamp could not be parsed
    ///
    /// Example: `"2024-13-45 25:00"`
    InvalidTimestamp { record: usize, value: String },

    /// Resource type is empty or whitespace
    EmptyResourceType { record: usize },

    /// Input document is not a JSON array
    NotAnArray(String),

    /// Array element is not a JSON object
    ///
    /// Example: `[42]`
    NotAnObject { record: usize, found: &'static str },

    /// CSV format error (malformed row, missing header)
    CsvFormat(String),
}

impl ValidationError {
    /// Index of the offending record, if the error concerns a single record
    pub fn record_index(&self) -> Option<usize> {
        match self {
            ValidationError::NotANumber { record, .. }
            | ValidationError::NonFinite { record, .. }
            | ValidationError::Negative { record, .. }
            | ValidationError::MissingField { record, .. }
            | ValidationError::WrongType { record, .. }
            | ValidationError::InvalidTimestamp { record, .. }
            | ValidationError::EmptyResourceType { record }
            | ValidationError::NotAnObject { record, .. } => Some(*record),
            ValidationError::NotAnArray(_) | ValidationError::CsvFormat(_) => None,
        }
    }

    /// Name of the offending field, if the error concerns a single field
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::NotANumber { field, .. }
            | ValidationError::NonFinite { field, .. }
            | ValidationError::Negative { field, .. }
            | ValidationError::MissingField { field, .. }
            | ValidationError::WrongType { field, .. } => Some(field),
            ValidationError::InvalidTimestamp { .. } => Some("timestamp"),
            ValidationError::EmptyResourceType { .. } => Some("resource_type"),
            ValidationError::NotAnObject { .. }
            | ValidationError::NotAnArray(_)
            | ValidationError::CsvFormat(_) => None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotANumber {
                record,
                field,
                value,
            } => {
                write!(
                    f,
                    "Record {}: field '{}' is not a number: '{}'",
                    record, field, value
                )
            }
            ValidationError::NonFinite {
                record,
                field,
                value,
            } => {
                write!(
                    f,
                    "Record {}: field '{}' must be finite, got {}",
                    record, field, value
                )
            }
            ValidationError::Negative {
                record,
                field,
                value,
            } => {
                write!(
                    f,
                    "Record {}: field '{}' must not be negative, got {} MW",
                    record, field, value
                )
            }
            ValidationError::MissingField { record, field } => {
                write!(f, "Record {}: missing required field '{}'", record, field)
            }
            ValidationError::WrongType {
                record,
                field,
                expected,
            } => {
                write!(
                    f,
                    "Record {}: field '{}' has wrong type (expected {})",
                    record, field, expected
                )
            }
            ValidationError::InvalidTimestamp { record, value } => {
                write!(
                    f,
                    "Record {}: invalid timestamp '{}' (expected RFC 3339 or YYYY-MM-DD HH:MM:SS)",
                    record, value
                )
            }
            ValidationError::EmptyResourceType { record } => {
                write!(f, "Record {}: field 'resource_type' is empty", record)
            }
            ValidationError::NotAnObject { record, found } => {
                write!(f, "Record {}: expected a JSON object, found {}", record, found)
            }
            ValidationError::NotAnArray(msg) => {
                write!(f, "Expected a JSON array of records: {}", msg)
            }
            ValidationError::CsvFormat(msg) => {
                write!(f, "CSV format error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Data source errors
///
/// Occurs while fetching records from the energy data endpoint or a local file
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// HTTP error with status code and response body
    ///
    /// Common codes:
    /// - 400: Bad request (unknown country)
    /// - 500: Server error
    HttpError { status: u16, body: String },

    /// Rate limit exceeded (HTTP 429)
    RateLimited,

    /// Network error (connection refused, timeout, DNS failure)
    NetworkError(String),

    /// Response body is not a valid JSON document
    InvalidJsonResponse(String),

    /// Country code is not two upper-case ASCII letters
    ///
    /// Example: "deu", "D1"
    InvalidCountryCode(String),

    /// Local record file could not be read
    Io(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {} error: {}", status, body)
            }
            ApiError::RateLimited => {
                write!(f, "Rate limit exceeded (HTTP 429)")
            }
            ApiError::NetworkError(msg) => {
                write!(f, "Network error: {}", msg)
            }
            ApiError::InvalidJsonResponse(msg) => {
                write!(f, "Invalid JSON response: {}", msg)
            }
            ApiError::InvalidCountryCode(code) => {
                write!(
                    f,
                    "Invalid country code: '{}' (expected two upper-case letters, e.g. DE)",
                    code
                )
            }
            ApiError::Io(msg) => {
                write!(f, "I/O error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Required option is missing
    MissingOption(String),

    /// Option is present but cannot be interpreted
    InvalidValue { key: String, value: String },

    /// Config file could not be read
    Io(String),

    /// Config file is not valid TOML or has the wrong shape
    Toml(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingOption(key) => {
                write!(f, "Missing required option '{}'", key)
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for option '{}': '{}'", key, value)
            }
            ConfigError::Io(msg) => write!(f, "Cannot read config file: {}", msg),
            ConfigError::Toml(msg) => write!(f, "Invalid config file: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_conversion() {
        let err = ValidationError::EmptyResourceType { record: 3 };
        let dash_err: DashboardError = err.into();

        match dash_err {
            DashboardError::Validation(ValidationError::EmptyResourceType { record }) => {
                assert_eq!(record, 3);
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_api_error_conversion() {
        let err = ApiError::RateLimited;
        let dash_err: DashboardError = err.into();

        match dash_err {
            DashboardError::Api(ApiError::RateLimited) => {}
            _ => panic!("Expected Api error"),
        }
    }

    #[test]
    fn test_config_error_conversion() {
        let err = ConfigError::MissingOption("api_base_url".to_string());
        let dash_err: DashboardError = err.into();

        assert!(matches!(
            dash_err,
            DashboardError::Config(ConfigError::MissingOption(_))
        ));
    }

    #[test]
    fn test_validation_error_identifies_record_and_field() {
        let err = ValidationError::NotANumber {
            record: 7,
            field: "actual_generation_mw",
            value: "abc".to_string(),
        };
        assert_eq!(err.record_index(), Some(7));
        assert_eq!(err.field(), Some("actual_generation_mw"));

        let msg = format!("{}", err);
        assert!(msg.contains("Record 7"));
        assert!(msg.contains("actual_generation_mw"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_timestamp_error_reports_timestamp_field() {
        let err = ValidationError::InvalidTimestamp {
            record: 0,
            value: "yesterday".to_string(),
        };
        assert_eq!(err.field(), Some("timestamp"));
    }

    #[test]
    fn test_document_level_errors_have_no_record() {
        let err = ValidationError::NotAnArray("found object".to_string());
        assert_eq!(err.record_index(), None);
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_non_object_element_identifies_record() {
        let err = ValidationError::NotAnObject {
            record: 2,
            found: "number",
        };
        assert_eq!(err.record_index(), Some(2));
        assert_eq!(err.field(), None);
        assert!(format!("{}", err).contains("Record 2"));
    }

    #[test]
    fn test_http_error_formatting() {
        let err = ApiError::HttpError {
            status: 500,
            body: "Internal Server Error".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("HTTP 500"));
        assert!(msg.contains("Internal Server Error"));
    }
}
