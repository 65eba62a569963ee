//! Data structures for generation records and derived statistics
//!
//! `GenerationRecord` is the input unit delivered by the energy data endpoint;
//! `DerivedStats` is the summary the dashboard views read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classification::ResourceCategory;

/// One generation sample for one resource type at one point in time
///
/// Mirrors the JSON objects returned by `GET /api/energy-data/?country=XX`:
///
/// ```json
/// {
///   "timestamp": "2024-10-24T06:00:00Z",
///   "country_code": "DE",
///   "resource_type": "Wind Onshore",
///   "actual_generation_mw": 12450.0,
///   "forecast_generation_mw": null
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Sample time (UTC)
    pub timestamp: DateTime<Utc>,

    /// ISO country code of the market the sample belongs to
    ///
    /// Optional because the aggregator never reads it; file sources use it to
    /// filter mixed-country exports.
    #[serde(default)]
    pub country_code: Option<String>,

    /// Production type label
    /// Example: "Wind Onshore", "Fossil Gas", "Nuclear"
    pub resource_type: String,

    /// Measured output in MW
    /// None represents a null value in the feed and is treated as 0.0 when summing
    #[serde(default)]
    pub actual_generation_mw: Option<f64>,

    /// Forecast output in MW for the same sample
    /// None when no forecast was published
    #[serde(default)]
    pub forecast_generation_mw: Option<f64>,
}

impl GenerationRecord {
    /// Create a record with the given actual and forecast values
    ///
    /// # Examples
    ///
    /// ```
    /// # use energy_resilience_stats::GenerationRecord;
    /// # use chrono::{TimeZone, Utc};
    /// let ts = Utc.with_ymd_and_hms(2024, 10, 24, 6, 0, 0).unwrap();
    /// let record = GenerationRecord::new(ts, "Solar", Some(120.0), None);
    /// assert_eq!(record.actual_mw(), 120.0);
    /// assert_eq!(record.absolute_error_mw(), None);
    /// ```
    pub fn new(
        timestamp: DateTime<Utc>,
        resource_type: impl Into<String>,
        actual_generation_mw: Option<f64>,
        forecast_generation_mw: Option<f64>,
    ) -> Self {
        Self {
            timestamp,
            country_code: None,
            resource_type: resource_type.into(),
            actual_generation_mw,
            forecast_generation_mw,
        }
    }

    /// Attach a country code
    pub fn with_country(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }

    /// Actual output with null treated as 0.0
    ///
    /// - `None` = value missing in the feed, contributes nothing to totals
    /// - `Some(0.0)` = measured zero output (e.g. solar at night)
    ///
    /// A feed value of `-0.0` is returned as `0.0`.
    pub fn actual_mw(&self) -> f64 {
        self.actual_generation_mw.map_or(0.0, |mw| mw + 0.0)
    }

    /// Absolute forecast error `|actual - forecast|`
    ///
    /// Returns `None` when no forecast is present. A missing actual value is
    /// counted as 0.0, so a forecast without a measurement yields the full
    /// forecast as error.
    pub fn absolute_error_mw(&self) -> Option<f64> {
        self.forecast_generation_mw
            .map(|forecast| (self.actual_mw() - forecast).abs())
    }
}

/// Summed output of one resource type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceShare {
    /// Exact `resource_type` label the group was built from
    pub name: String,

    /// Category the label was classified into
    pub category: ResourceCategory,

    /// Summed actual output in MW
    #[serde(rename = "rawMW")]
    pub total_mw: f64,

    /// Summed output in GW, rounded to 2 decimals
    pub gw: f64,

    /// Share of total output in percent, rounded to 1 decimal
    /// 0.0 when total output is zero
    pub percentage: f64,
}

/// Severity of an advisory alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

/// Advisory alert derived from the statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    /// Stable identifier (1 = low renewable share, 2 = low diversity)
    pub id: u32,

    #[serde(rename = "type")]
    pub severity: AlertSeverity,

    pub title: String,

    #[serde(rename = "desc")]
    pub description: String,
}

/// Statistics derived from one record set
///
/// A fresh value is computed for every record set; it has no identity across
/// recomputations. `Default` is the documented zero state for empty input.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DerivedStats {
    /// Raw summed output in MW
    #[serde(rename = "totalMW")]
    pub total_mw: f64,

    /// Summed output in GW, rounded to 1 decimal
    #[serde(rename = "totalGW")]
    pub total_gw: f64,

    /// Renewable share of total output, in [0, 100], unrounded
    #[serde(rename = "renewPercent")]
    pub renew_percent: f64,

    /// Mean absolute forecast error in MW over records that carry a forecast
    #[serde(rename = "meanAbsoluteError")]
    pub mean_absolute_error: f64,

    /// Per resource type totals, descending by MW
    #[serde(rename = "resourceBreakdown")]
    pub resource_breakdown: Vec<ResourceShare>,

    /// Number of resource types with output strictly above zero
    #[serde(rename = "activeResourceCount")]
    pub active_resource_count: usize,

    /// Heuristic diversity/renewables score in [0, 100]
    #[serde(rename = "resilienceScore")]
    pub resilience_score: u8,

    pub alerts: Vec<Alert>,
}

impl DerivedStats {
    /// Largest `n` resources (fewer if the breakdown is shorter)
    ///
    /// The dashboard shows the top 5 in "Top Resource Mix" and the regional charts.
    pub fn top_resources(&self, n: usize) -> &[ResourceShare] {
        let end = n.min(self.resource_breakdown.len());
        &self.resource_breakdown[..end]
    }

    /// True when no alert was raised
    pub fn is_stable(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Alerts of a given severity
    pub fn alerts_of(&self, severity: AlertSeverity) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(move |a| a.severity == severity)
    }

    /// Total output formatted with 1 decimal, e.g. `"1.0"`
    pub fn total_gw_display(&self) -> String {
        format!("{:.1}", self.total_gw)
    }

    /// Renewable share formatted as whole percent, e.g. `"30"`
    pub fn renew_percent_display(&self) -> String {
        format!("{:.0}", self.renew_percent)
    }

    /// Mean absolute error formatted with 1 decimal, e.g. `"20.0"`
    pub fn mean_absolute_error_display(&self) -> String {
        format!("{:.1}", self.mean_absolute_error)
    }
}

/// Summed actual output at one timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub timestamp: DateTime<Utc>,

    /// Sum of actual output over all resource types, MW
    pub actual_generation_mw: f64,

    /// Sum of forecasts at this timestamp, None if no record carried one
    pub forecast_generation_mw: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 24, 6, 0, 0).unwrap()
    }

    #[test]
    fn test_actual_mw_folds_negative_zero() {
        let ts = Utc.with_ymd_and_hms(2024, 10, 24, 6, 0, 0).unwrap();
        let record = GenerationRecord::new(ts, "Solar", Some(-0.0), None);
        assert!(record.actual_mw().is_sign_positive());
    }

    #[test]
    fn test_actual_mw_treats_null_as_zero() {
        let record = GenerationRecord::new(ts(), "Solar", None, None);
        assert_eq!(record.actual_mw(), 0.0);
    }

    #[test]
    fn test_absolute_error_with_forecast() {
        let record = GenerationRecord::new(ts(), "Wind", Some(300.0), Some(280.0));
        assert_eq!(record.absolute_error_mw(), Some(20.0));

        let under = GenerationRecord::new(ts(), "Wind", Some(250.0), Some(280.0));
        assert_eq!(under.absolute_error_mw(), Some(30.0));
    }

    #[test]
    fn test_absolute_error_with_missing_actual() {
        let record = GenerationRecord::new(ts(), "Wind", None, Some(50.0));
        assert_eq!(record.absolute_error_mw(), Some(50.0));
    }

    #[test]
    fn test_record_deserializes_api_shape() {
        let json = r#"{
            "timestamp": "2024-10-24T06:00:00Z",
            "country_code": "DE",
            "resource_type": "Wind Onshore",
            "actual_generation_mw": 12450.0,
            "forecast_generation_mw": null
        }"#;

        let record: GenerationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.timestamp, ts());
        assert_eq!(record.country_code.as_deref(), Some("DE"));
        assert_eq!(record.actual_generation_mw, Some(12450.0));
        assert_eq!(record.forecast_generation_mw, None);
    }

    #[test]
    fn test_zero_state_is_default() {
        let stats = DerivedStats::default();
        assert_eq!(stats.total_gw, 0.0);
        assert_eq!(stats.resilience_score, 0);
        assert!(stats.resource_breakdown.is_empty());
        assert!(stats.is_stable());
        assert_eq!(stats.total_gw_display(), "0.0");
        assert_eq!(stats.renew_percent_display(), "0");
    }

    #[test]
    fn test_top_resources_shorter_than_n() {
        let stats = DerivedStats::default();
        assert!(stats.top_resources(5).is_empty());
    }

    #[test]
    fn test_stats_serialize_with_dashboard_names() {
        let stats = DerivedStats {
            total_gw: 1.0,
            renew_percent: 30.0,
            ..DerivedStats::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalGW"], 1.0);
        assert_eq!(json["renewPercent"], 30.0);
        assert!(json["resourceBreakdown"].as_array().unwrap().is_empty());
    }
}
