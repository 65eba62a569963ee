//! Record sources
//!
//! A [`RecordSource`] delivers the generation records of one country. The
//! aggregator does not care where they come from:
//!
//! - [`HttpRecordSource`]: the local energy data API (`GET /api/energy-data/?country=XX`)
//! - [`FileRecordSource`]: a JSON or CSV export on disk
//! - [`MemoryRecordSource`]: records held in memory, keyed by country
//!
//! Sources make exactly one attempt per call. There is no retry, backoff or
//! caching; a failure is reported to the caller, who shows it as unavailable data.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::csv_parser::parse_records_csv;
use crate::endpoint::{build_records_url, CountryCode};
use crate::error::{ApiError, DashboardError};
use crate::types::GenerationRecord;
use crate::validation::records_from_json;

/// Supplies generation records for a requested country
pub trait RecordSource {
    fn fetch(&self, country: &CountryCode) -> Result<Vec<GenerationRecord>, DashboardError>;
}

// ============================================================================
// HTTP Source
// ============================================================================

/// Records from the energy data HTTP endpoint
pub struct HttpRecordSource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpRecordSource {
    /// Create a source for the given API base URL
    ///
    /// # Arguments
    ///
    /// * `base_url` - e.g. `http://127.0.0.1:8000`
    /// * `timeout` - applied to the whole request
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.into(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform the GET request and return the body
    ///
    /// `Ok(None)` means the endpoint has no data for this country (HTTP 404).
    fn get_body(&self, url: &str) -> Result<Option<String>, ApiError> {
        debug!(url, "fetching generation records");

        match self.agent.get(url).set("accept", "application/json").call() {
            Ok(response) => {
                let status = response.status();
                let body = response.into_string().map_err(|e| {
                    ApiError::NetworkError(format!("failed to read body from {}: {}", url, e))
                })?;
                interpret_status(status, body)
            }
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                interpret_status(status, body)
            }
            Err(ureq::Error::Transport(transport)) => {
                warn!(url, error = %transport, "energy data endpoint unreachable");
                Err(ApiError::NetworkError(format!(
                    "GET {} failed: {}",
                    url, transport
                )))
            }
        }
    }
}

impl RecordSource for HttpRecordSource {
    fn fetch(&self, country: &CountryCode) -> Result<Vec<GenerationRecord>, DashboardError> {
        let url = build_records_url(&self.base_url, country);

        let records = match self.get_body(&url)? {
            Some(body) => parse_records_body(&body)?,
            None => Vec::new(),
        };

        info!(country = %country, count = records.len(), "received generation records");
        Ok(records)
    }
}

/// Map an HTTP status and body to a result
///
/// - 200 → body (empty body means no data)
/// - 404 → no data for this selection
/// - 429 → rate limited
/// - anything else → HTTP error carrying the body
fn interpret_status(status: u16, body: String) -> Result<Option<String>, ApiError> {
    match status {
        200 => {
            if body.trim().is_empty() {
                Ok(None)
            } else {
                Ok(Some(body))
            }
        }
        404 => Ok(None),
        429 => Err(ApiError::RateLimited),
        _ => Err(ApiError::HttpError { status, body }),
    }
}

/// Parse a JSON response body into validated records
pub fn parse_records_body(body: &str) -> Result<Vec<GenerationRecord>, DashboardError> {
    let document: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidJsonResponse(e.to_string()))?;

    Ok(records_from_json(&document)?)
}

// ============================================================================
// File Source
// ============================================================================

/// Records from a JSON (`.json`) or CSV (`.csv`) export
///
/// When records carry a `country_code`, only those matching the requested
/// country are returned. Records without a country code are always returned.
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    path: PathBuf,
}

impl FileRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_csv(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
    }

    /// Load every record in the file, regardless of country
    pub fn load_all(&self) -> Result<Vec<GenerationRecord>, DashboardError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| ApiError::Io(format!("{}: {}", self.path.display(), e)))?;

        debug!(path = %self.path.display(), "loading generation records from file");

        if self.is_csv() {
            Ok(parse_records_csv(&content)?)
        } else if content.trim().is_empty() {
            Ok(Vec::new())
        } else {
            parse_records_body(&content)
        }
    }
}

impl RecordSource for FileRecordSource {
    fn fetch(&self, country: &CountryCode) -> Result<Vec<GenerationRecord>, DashboardError> {
        let mut records = self.load_all()?;
        records.retain(|r| {
            r.country_code
                .as_deref()
                .map_or(true, |code| code == country.as_str())
        });

        info!(country = %country, count = records.len(), path = %self.path.display(), "loaded generation records");
        Ok(records)
    }
}

// ============================================================================
// Memory Source
// ============================================================================

/// Fixed records per country
///
/// Countries without an entry yield an empty set; countries registered with
/// [`MemoryRecordSource::fail`] yield the stored error.
#[derive(Debug, Default, Clone)]
pub struct MemoryRecordSource {
    records: HashMap<CountryCode, Vec<GenerationRecord>>,
    failures: HashMap<CountryCode, ApiError>,
}

impl MemoryRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, country: CountryCode, records: Vec<GenerationRecord>) {
        self.failures.remove(&country);
        self.records.insert(country, records);
    }

    pub fn fail(&mut self, country: CountryCode, error: ApiError) {
        self.records.remove(&country);
        self.failures.insert(country, error);
    }
}

impl RecordSource for MemoryRecordSource {
    fn fetch(&self, country: &CountryCode) -> Result<Vec<GenerationRecord>, DashboardError> {
        if let Some(error) = self.failures.get(country) {
            return Err(error.clone().into());
        }
        Ok(self.records.get(country).cloned().unwrap_or_default())
    }
}
