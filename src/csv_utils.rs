//! Shared CSV helpers
//!
//! Column lookup by header name, so exports with reordered or extra columns
//! still load.

use crate::error::ValidationError;

/// Look up a field by column name
///
/// # Returns
///
/// * `Some(&str)` - Field value (may be empty)
/// * `None` - Column not present in the header, or row too short
///
/// # Example
///
/// ```rust
/// use csv::StringRecord;
/// use energy_resilience_stats::csv_utils::get_field;
///
/// let headers = StringRecord::from(vec!["timestamp", "resource_type"]);
/// let record = StringRecord::from(vec!["2024-10-24T06:00:00Z", "Solar"]);
///
/// assert_eq!(get_field(&record, &headers, "resource_type"), Some("Solar"));
/// assert_eq!(get_field(&record, &headers, "country_code"), None);
/// ```
pub fn get_field<'a>(
    record: &'a csv::StringRecord,
    headers: &csv::StringRecord,
    field_name: &str,
) -> Option<&'a str> {
    let idx = headers.iter().position(|h| h == field_name)?;
    record.get(idx)
}

/// Ensure every required column is present in the header
pub fn require_columns(
    headers: &csv::StringRecord,
    required: &[&str],
) -> Result<(), ValidationError> {
    for col in required {
        if !headers.iter().any(|h| h == *col) {
            return Err(ValidationError::CsvFormat(format!(
                "missing required column '{}'",
                col
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_field_success() {
        let headers = csv::StringRecord::from(vec!["col1", "col2", "col3"]);
        let record = csv::StringRecord::from(vec!["a", "b", "c"]);

        assert_eq!(get_field(&record, &headers, "col1"), Some("a"));
        assert_eq!(get_field(&record, &headers, "col3"), Some("c"));
    }

    #[test]
    fn test_get_field_missing_column() {
        let headers = csv::StringRecord::from(vec!["col1", "col2"]);
        let record = csv::StringRecord::from(vec!["a", "b"]);

        assert_eq!(get_field(&record, &headers, "col3"), None);
    }

    #[test]
    fn test_get_field_empty_value() {
        let headers = csv::StringRecord::from(vec!["col1"]);
        let record = csv::StringRecord::from(vec![""]);

        assert_eq!(get_field(&record, &headers, "col1"), Some(""));
    }

    #[test]
    fn test_require_columns() {
        let headers = csv::StringRecord::from(vec!["timestamp", "resource_type"]);
        assert!(require_columns(&headers, &["timestamp"]).is_ok());

        let err = require_columns(&headers, &["timestamp", "actual_generation_mw"]).unwrap_err();
        assert!(format!("{}", err).contains("actual_generation_mw"));
    }
}
