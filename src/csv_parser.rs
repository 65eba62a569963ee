//! CSV loader for generation record exports
//!
//! Reads the table layout the ingestion pipeline writes:
//!
//! - **Delimiter:** Comma
//! - **Header Row:** Always present
//! - **Required columns:** `timestamp`, `resource_type`, `actual_generation_mw`
//! - **Optional columns:** `country_code`, `forecast_generation_mw`
//! - **Nulls:** empty cell, `null`, `None`, `N/A`
//!
//! # Example
//!
//! ```rust
//! use energy_resilience_stats::csv_parser::parse_records_csv;
//!
//! let csv = "timestamp,country_code,resource_type,actual_generation_mw,forecast_generation_mw
//! 2024-10-24 06:00:00+00:00,DE,Solar,1200.5,
//! 2024-10-24 06:00:00+00:00,DE,Nuclear,4100,4000";
//!
//! let records = parse_records_csv(csv).unwrap();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].forecast_generation_mw, None);
//! assert_eq!(records[1].forecast_generation_mw, Some(4000.0));
//! ```

use csv::ReaderBuilder;

use crate::csv_utils::{get_field, require_columns};
use crate::error::ValidationError;
use crate::types::GenerationRecord;
use crate::validation::*;

const REQUIRED_COLUMNS: [&str; 3] = [FIELD_TIMESTAMP, FIELD_RESOURCE_TYPE, FIELD_ACTUAL];

/// Parse a CSV export into validated records
///
/// Data rows are numbered from 0 in errors, matching the position of the
/// record in the returned vector.
///
/// # Returns
///
/// * `Ok(Vec<GenerationRecord>)` - parsed rows; empty content gives an empty vector
/// * `Err(ValidationError)` - missing column, malformed row, or invalid value
pub fn parse_records_csv(csv_content: &str) -> Result<Vec<GenerationRecord>, ValidationError> {
    if csv_content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(csv_content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ValidationError::CsvFormat(format!("failed to read header: {}", e)))?
        .clone();

    require_columns(&headers, &REQUIRED_COLUMNS)?;

    let mut records = Vec::new();

    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|e| ValidationError::CsvFormat(format!("row {}: {}", index, e)))?;
        records.push(parse_row(&row, &headers, index)?);
    }

    Ok(records)
}

fn parse_row(
    row: &csv::StringRecord,
    headers: &csv::StringRecord,
    index: usize,
) -> Result<GenerationRecord, ValidationError> {
    let timestamp_raw = get_field(row, headers, FIELD_TIMESTAMP)
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField {
            record: index,
            field: FIELD_TIMESTAMP,
        })?;
    let timestamp = parse_timestamp(timestamp_raw, index)?;

    let resource_type = get_field(row, headers, FIELD_RESOURCE_TYPE)
        .unwrap_or_default()
        .to_string();

    let country_code = get_field(row, headers, FIELD_COUNTRY_CODE)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let actual_generation_mw = match get_field(row, headers, FIELD_ACTUAL) {
        Some(raw) => parse_generation_value(raw, index, FIELD_ACTUAL)?,
        None => None,
    };
    let forecast_generation_mw = match get_field(row, headers, FIELD_FORECAST) {
        Some(raw) => parse_generation_value(raw, index, FIELD_FORECAST)?,
        None => None,
    };

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

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "timestamp,country_code,resource_type,actual_generation_mw,forecast_generation_mw";

    #[test]
    fn test_parse_valid_rows() {
        let csv = format!(
            "{}\n2024-10-24T06:00:00Z,FR,Nuclear,41000,40500\n2024-10-24T06:00:00Z,FR,Wind Onshore,,\n",
            HEADER
        );

        let records = parse_records_csv(&csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].country_code.as_deref(), Some("FR"));
        assert_eq!(records[0].actual_generation_mw, Some(41000.0));
        assert_eq!(records[1].actual_generation_mw, None);
        assert_eq!(records[1].forecast_generation_mw, None);
    }

    #[test]
    fn test_parse_without_optional_columns() {
        let csv = "resource_type,timestamp,actual_generation_mw\nSolar,2024-10-24 12:00:00,300";
        let records = parse_records_csv(csv).unwrap();
        assert_eq!(records[0].resource_type, "Solar");
        assert_eq!(records[0].country_code, None);
        assert_eq!(records[0].forecast_generation_mw, None);
    }

    #[test]
    fn test_parse_empty_content() {
        assert!(parse_records_csv("").unwrap().is_empty());
        assert!(parse_records_csv(HEADER).unwrap().is_empty());
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "timestamp,resource_type\n2024-10-24T06:00:00Z,Solar";
        let err = parse_records_csv(csv).unwrap_err();
        assert!(matches!(err, ValidationError::CsvFormat(_)));
    }

    #[test]
    fn test_invalid_number_identifies_row_and_field() {
        let csv = format!(
            "{}\n2024-10-24T06:00:00Z,DE,Solar,100,\n2024-10-24T06:00:00Z,DE,Wind,abc,\n",
            HEADER
        );
        let err = parse_records_csv(&csv).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotANumber {
                record: 1,
                field: FIELD_ACTUAL,
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_blank_resource_type_rejected() {
        let csv = format!("{}\n2024-10-24T06:00:00Z,DE,,100,\n", HEADER);
        let err = parse_records_csv(&csv).unwrap_err();
        assert_eq!(err, ValidationError::EmptyResourceType { record: 0 });
    }

    #[test]
    fn test_missing_timestamp_value() {
        let csv = format!("{}\n,DE,Solar,100,\n", HEADER);
        let err = parse_records_csv(&csv).unwrap_err();
        assert_eq!(err.field(), Some(FIELD_TIMESTAMP));
    }

    #[test]
    fn test_ragged_row_is_format_error() {
        let csv = format!("{}\n2024-10-24T06:00:00Z,DE,Solar\n", HEADER);
        let err = parse_records_csv(&csv).unwrap_err();
        assert!(matches!(err, ValidationError::CsvFormat(_)));
    }
}
