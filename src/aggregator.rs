//! Derived statistics over a set of generation records
//!
//! [`StatsAggregator`] reduces a slice of [`GenerationRecord`] into
//! [`DerivedStats`]: total output, mean absolute forecast error, renewable
//! share, a per-resource breakdown, a resilience score and advisory alerts.
//!
//! The reduction is pure and synchronous. Records are validated first; a
//! malformed record rejects the whole set with a [`ValidationError`]. An empty
//! slice is not an error and yields `DerivedStats::default()`.
//!
//! # Resilience score
//!
//! `clamp(0, 100, active_types * 8 + renew_percent * 0.4)`, rounded.
//! This is a simple heuristic, not a physically grounded metric. The
//! coefficients are configurable through [`AggregatorConfig`] and default to
//! the values the dashboard has always shown.
//!
//! # Example
//!
//! ```rust
//! use energy_resilience_stats::{aggregate, GenerationRecord};
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.with_ymd_and_hms(2024, 10, 24, 6, 0, 0).unwrap();
//! let records = vec![
//!     GenerationRecord::new(ts, "Wind", Some(300.0), Some(280.0)),
//!     GenerationRecord::new(ts, "Coal", Some(700.0), None),
//! ];
//!
//! let stats = aggregate(&records).unwrap();
//! assert_eq!(stats.total_gw, 1.0);
//! assert_eq!(stats.renew_percent_display(), "30");
//! assert_eq!(stats.mean_absolute_error, 20.0);
//! assert_eq!(stats.resource_breakdown[0].name, "Coal");
//! assert_eq!(stats.resilience_score, 28);
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use crate::classification::{is_renewable, ClassificationMode, ResourceCategory};
use crate::error::ValidationError;
use crate::types::{Alert, AlertSeverity, DerivedStats, GenerationRecord, ResourceShare};
use crate::validation::validate_records;

/// Tunables for the aggregation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregatorConfig {
    /// How renewable resource types are recognised
    pub classification: ClassificationMode,

    /// Score points per active resource type
    pub diversity_weight: f64,

    /// Score points per percent of renewable share
    pub renewable_weight: f64,

    /// Renewable share (percent) below which a warning is raised
    pub renewable_warning_percent: f64,

    /// Active resource types below which a critical alert is raised
    pub min_active_resources: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            classification: ClassificationMode::Enumerated,
            diversity_weight: 8.0,
            renewable_weight: 0.4,
            renewable_warning_percent: 25.0,
            min_active_resources: 4,
        }
    }
}

/// Aggregates generation records into [`DerivedStats`]
#[derive(Debug, Clone, Default)]
pub struct StatsAggregator {
    config: AggregatorConfig,
}

impl StatsAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Validate and aggregate
    ///
    /// # Returns
    ///
    /// * `Ok(DerivedStats)` - statistics, or the zero state for empty input
    /// * `Err(ValidationError)` - first malformed record, with index and field
    pub fn aggregate(&self, records: &[GenerationRecord]) -> Result<DerivedStats, ValidationError> {
        validate_records(records)?;
        Ok(self.compute(records))
    }

    fn compute(&self, records: &[GenerationRecord]) -> DerivedStats {
        if records.is_empty() {
            return DerivedStats::default();
        }

        // 1. Total output
        let total_mw: f64 = records.iter().map(GenerationRecord::actual_mw).sum();

        // 2. Forecast error over records that carry a forecast
        let errors: Vec<f64> = records
            .iter()
            .filter_map(GenerationRecord::absolute_error_mw)
            .collect();
        let mean_absolute_error = if errors.is_empty() {
            0.0
        } else {
            errors.iter().sum::<f64>() / errors.len() as f64
        };

        // 3. Renewable share
        let renewable_mw: f64 = records
            .iter()
            .filter(|r| is_renewable(&r.resource_type, self.config.classification))
            .map(GenerationRecord::actual_mw)
            .sum();
        let renew_percent = share_percent(renewable_mw, total_mw);

        // 4. Breakdown, 5. active types
        let resource_breakdown = breakdown(records, total_mw, self.config.classification);
        let active_resource_count = resource_breakdown
            .iter()
            .filter(|r| r.total_mw > 0.0)
            .count();

        // 6. Score
        let resilience_score = self.resilience_score(active_resource_count, renew_percent);

        // 7. Alerts
        let alerts = self.alerts(active_resource_count, renew_percent);

        DerivedStats {
            total_mw,
            total_gw: round_to(total_mw / 1000.0, 1),
            renew_percent,
            mean_absolute_error,
            resource_breakdown,
            active_resource_count,
            resilience_score,
            alerts,
        }
    }

    /// Heuristic score in [0, 100]
    ///
    /// # Examples
    ///
    /// ```
    /// # use energy_resilience_stats::StatsAggregator;
    /// let aggregator = StatsAggregator::default();
    /// assert_eq!(aggregator.resilience_score(2, 30.0), 28);
    /// assert_eq!(aggregator.resilience_score(20, 100.0), 100);
    /// assert_eq!(aggregator.resilience_score(0, 0.0), 0);
    /// ```
    pub fn resilience_score(&self, active_resource_count: usize, renew_percent: f64) -> u8 {
        let raw = active_resource_count as f64 * self.config.diversity_weight
            + renew_percent * self.config.renewable_weight;

        raw.clamp(0.0, 100.0).round() as u8
    }

    /// Advisory alerts for the given share and diversity
    ///
    /// - warning (id 1) when the renewable share is below the threshold
    /// - critical (id 2) when fewer resource types than required are active
    pub fn alerts(&self, active_resource_count: usize, renew_percent: f64) -> Vec<Alert> {
        let mut alerts = Vec::new();

        if renew_percent < self.config.renewable_warning_percent {
            alerts.push(Alert {
                id: 1,
                severity: AlertSeverity::Warning,
                title: "Low Green Energy".to_string(),
                description: "Renewable share is below safety threshold.".to_string(),
            });
        }

        if active_resource_count < self.config.min_active_resources {
            alerts.push(Alert {
                id: 2,
                severity: AlertSeverity::Critical,
                title: "Diversity Risk".to_string(),
                description: "Few energy sources active. High grid vulnerability.".to_string(),
            });
        }

        alerts
    }
}

/// Aggregate with the default configuration
pub fn aggregate(records: &[GenerationRecord]) -> Result<DerivedStats, ValidationError> {
    StatsAggregator::default().aggregate(records)
}

/// Group by exact resource type, keeping first-seen order, then sort
/// descending by MW. The sort is stable, so equal totals stay in first-seen order.
fn breakdown(
    records: &[GenerationRecord],
    total_mw: f64,
    mode: ClassificationMode,
) -> Vec<ResourceShare> {
    let mut order: Vec<(&str, f64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let name = record.resource_type.as_str();
        match index.get(name).copied() {
            Some(i) => order[i].1 += record.actual_mw(),
            None => {
                index.insert(name, order.len());
                order.push((name, record.actual_mw()));
            }
        }
    }

    let mut shares: Vec<ResourceShare> = order
        .into_iter()
        .map(|(name, mw)| ResourceShare {
            name: name.to_string(),
            category: ResourceCategory::classify_with(name, mode),
            total_mw: mw,
            gw: round_to(mw / 1000.0, 2),
            percentage: round_to(share_percent(mw, total_mw), 1),
        })
        .collect();

    shares.sort_by(|a, b| b.total_mw.total_cmp(&a.total_mw));
    shares
}

/// `part / total * 100`, or 0 when total is not positive
fn share_percent(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
