//! Record validation and conversion
//!
//! Records are checked before aggregation and malformed ones are rejected with
//! an error naming the record index and the field. Nothing is silently dropped
//! or coerced: a string where a number belongs is an error, not a zero.
//!
//! # Conversions
//!
//! 1. **JSON document → records**: `[{"timestamp": ..., ...}]` → `Vec<GenerationRecord>`
//! 2. **Timestamp normalization**: RFC 3339, `YYYY-MM-DD HH:MM:SS+00:00` or naive → UTC
//! 3. **Generation value parsing**: `"1234.5"` → `Some(1234.5)`, `""` / `"null"` → `None`
//!
//! # Example
//!
//! ```rust
//! use energy_resilience_stats::validation::*;
//!
//! let json: serde_json::Value = serde_json::from_str(r#"[
//!     {"timestamp": "2024-10-24T06:00:00Z", "resource_type": "Solar",
//!      "actual_generation_mw": 120.5, "forecast_generation_mw": null}
//! ]"#).unwrap();
//!
//! let records = records_from_json(&json).unwrap();
//! assert_eq!(records[0].actual_generation_mw, Some(120.5));
//!
//! let bad: serde_json::Value = serde_json::from_str(r#"[
//!     {"timestamp": "2024-10-24T06:00:00Z", "resource_type": "Solar",
//!      "actual_generation_mw": "lots"}
//! ]"#).unwrap();
//! let err = records_from_json(&bad).unwrap_err();
//! assert_eq!(err.field(), Some("actual_generation_mw"));
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::types::GenerationRecord;

pub const FIELD_TIMESTAMP: &str = "timestamp";
pub const FIELD_COUNTRY_CODE: &str = "country_code";
pub const FIELD_RESOURCE_TYPE: &str = "resource_type";
pub const FIELD_ACTUAL: &str = "actual_generation_mw";
pub const FIELD_FORECAST: &str = "forecast_generation_mw";

// ============================================================================
// Record Checks
// ============================================================================

/// Check a single record
///
/// # Rules
///
/// - `resource_type` must not be blank
/// - generation values, when present, must be finite and non-negative
pub fn validate_record(record: &GenerationRecord, index: usize) -> Result<(), ValidationError> {
    if record.resource_type.trim().is_empty() {
        return Err(ValidationError::EmptyResourceType { record: index });
    }

    check_generation(record.actual_generation_mw, index, FIELD_ACTUAL)?;
    check_generation(record.forecast_generation_mw, index, FIELD_FORECAST)?;

    Ok(())
}

/// Check every record, failing on the first malformed one
pub fn validate_records(records: &[GenerationRecord]) -> Result<(), ValidationError> {
    records
        .iter()
        .enumerate()
        .try_for_each(|(index, record)| validate_record(record, index))
}

fn check_generation(
    value: Option<f64>,
    record: usize,
    field: &'static str,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.is_finite() => Err(ValidationError::NonFinite {
            record,
            field,
            value: v,
        }),
        Some(v) if v < 0.0 => Err(ValidationError::Negative {
            record,
            field,
            value: v,
        }),
        _ => Ok(()),
    }
}

// ============================================================================
// Timestamp Normalization
// ============================================================================

/// Parse a timestamp string into UTC
///
/// Accepted formats:
/// - RFC 3339: `2024-10-24T06:00:00Z`, `2024-10-24T08:00:00+02:00`
/// - SQL style with offset: `2024-10-24 06:00:00+00:00`
/// - Naive (interpreted as UTC): `2024-10-24T06:00:00`, `2024-10-24 06:00:00`
///
/// # Examples
///
/// ```
/// # use energy_resilience_stats::validation::parse_timestamp;
/// let a = parse_timestamp("2024-10-24T08:00:00+02:00", 0).unwrap();
/// let b = parse_timestamp("2024-10-24 06:00:00", 0).unwrap();
/// assert_eq!(a, b);
/// assert!(parse_timestamp("24.10.2024", 0).is_err());
/// ```
pub fn parse_timestamp(value: &str, record: usize) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(ValidationError::InvalidTimestamp {
        record,
        value: value.to_string(),
    })
}

// ============================================================================
// Generation Value Parsing (text sources)
// ============================================================================

/// Parse a generation value from text
///
/// Empty strings and the null spellings `null`, `None`, `N/A` map to `None`.
/// Anything else must parse as a number; the result is then checked like any
/// other record value (finite, non-negative).
///
/// # Examples
///
/// ```
/// # use energy_resilience_stats::validation::parse_generation_value;
/// assert_eq!(parse_generation_value("1234.5", 0, "actual_generation_mw").unwrap(), Some(1234.5));
/// assert_eq!(parse_generation_value("", 0, "actual_generation_mw").unwrap(), None);
/// assert_eq!(parse_generation_value("null", 0, "actual_generation_mw").unwrap(), None);
/// assert!(parse_generation_value("12 MW", 0, "actual_generation_mw").is_err());
/// assert!(parse_generation_value("-5", 0, "actual_generation_mw").is_err());
/// ```
pub fn parse_generation_value(
    value: &str,
    record: usize,
    field: &'static str,
) -> Result<Option<f64>, ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("n/a")
    {
        return Ok(None);
    }

    let parsed = trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::NotANumber {
            record,
            field,
            value: value.to_string(),
        })?;

    check_generation(Some(parsed), record, field)?;
    Ok(Some(parsed))
}

// ============================================================================
// JSON Conversion
// ============================================================================

/// Convert a JSON document (array of record objects) into validated records
pub fn records_from_json(document: &Value) -> Result<Vec<GenerationRecord>, ValidationError> {
    let items = document.as_array().ok_or_else(|| {
        ValidationError::NotAnArray(format!("found {}", json_type_name(document)))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| record_from_json(item, index))
        .collect()
}

/// Convert a single JSON object into a validated record
pub fn record_from_json(item: &Value, index: usize) -> Result<GenerationRecord, ValidationError> {
    let object = item
        .as_object()
        .ok_or_else(|| ValidationError::NotAnObject {
            record: index,
            found: json_type_name(item),
        })?;

    let timestamp_raw = required_str(object, FIELD_TIMESTAMP, index)?;
    let timestamp = parse_timestamp(timestamp_raw, index)?;
    let resource_type = required_str(object, FIELD_RESOURCE_TYPE, index)?.to_string();
    let country_code = optional_str(object, FIELD_COUNTRY_CODE, index)?.map(str::to_string);
    let actual_generation_mw = optional_number(object, FIELD_ACTUAL, index)?;
    let forecast_generation_mw = optional_number(object, FIELD_FORECAST, index)?;

    let record = GenerationRecord {
        timestamp,
        country_code,
        resource_type,
        actual_generation_mw,
        forecast_generation_mw,
    };
    validate_record(&record, index)?;

    Ok(record)
}

fn required_str<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
    record: usize,
) -> Result<&'a str, ValidationError> {
    optional_str(object, field, record)?.ok_or(ValidationError::MissingField { record, field })
}

fn optional_str<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
    record: usize,
) -> Result<Option<&'a str>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ValidationError::WrongType {
            record,
            field,
            expected: "string",
        }),
    }
}

fn optional_number(
    object: &Map<String, Value>,
    field: &'static str,
    record: usize,
) -> Result<Option<f64>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or(ValidationError::NotANumber {
            record,
            field,
            value: n.to_string(),
        }),
        Some(Value::String(s)) => Err(ValidationError::NotANumber {
            record,
            field,
            value: s.clone(),
        }),
        Some(_) => Err(ValidationError::WrongType {
            record,
            field,
            expected: "number or null",
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
