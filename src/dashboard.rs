//! Dashboard state
//!
//! Holds the user's selection (country, view) and the data state derived from
//! the latest fetch. Selection is an explicit value handed to the renderer
//! through [`ViewContext`]; nothing here is global.
//!
//! # Fetch lifecycle
//!
//! Every country selection issues a [`FetchTicket`] with a fresh generation
//! number and moves the state to `Loading`. When a fetch finishes, its result
//! is applied with [`Dashboard::complete`]:
//!
//! - the ticket is current → state becomes `Ready` (records + stats) or
//!   `Unavailable` (fetch or validation failure)
//! - the ticket was superseded by a later selection → the result is discarded
//!
//! Stale statistics are never shown after a failure.
//!
//! # Example
//!
//! ```rust
//! use energy_resilience_stats::dashboard::*;
//! use energy_resilience_stats::endpoint::CountryCode;
//! use energy_resilience_stats::StatsAggregator;
//!
//! let de = CountryCode::parse("DE").unwrap();
//! let fr = CountryCode::parse("FR").unwrap();
//! let mut dashboard = Dashboard::new(de.clone(), StatsAggregator::default());
//!
//! let first = dashboard.select_country(de);
//! let second = dashboard.select_country(fr);
//!
//! // The FR result arrives first, then the stale DE one
//! assert!(dashboard.complete(&second, Ok(Vec::new())));
//! assert!(!dashboard.complete(&first, Ok(Vec::new())));
//! assert_eq!(dashboard.selection().country.as_str(), "FR");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregator::StatsAggregator;
use crate::endpoint::CountryCode;
use crate::error::DashboardError;
use crate::source::RecordSource;
use crate::types::{DerivedStats, GenerationRecord};

/// The four dashboard views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum View {
    #[default]
    Dashboard,
    RegionalAnalysis,
    GenerationMix,
    ResilienceStats,
}

impl View {
    pub const ALL: [View; 4] = [
        View::Dashboard,
        View::RegionalAnalysis,
        View::GenerationMix,
        View::ResilienceStats,
    ];

    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::RegionalAnalysis => "Regional Analysis",
            View::GenerationMix => "Generation Mix",
            View::ResilienceStats => "Resilience Stats",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for View {
    type Err = String;

    /// Accepts the title ("Generation Mix") or a short name ("mix")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "dashboard" => Ok(View::Dashboard),
            "regional analysis" | "regional" => Ok(View::RegionalAnalysis),
            "generation mix" | "mix" => Ok(View::GenerationMix),
            "resilience stats" | "resilience" => Ok(View::ResilienceStats),
            _ => Err(format!(
                "unknown view '{}' (expected dashboard, regional, mix or resilience)",
                s
            )),
        }
    }
}

/// What the user has selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub country: CountryCode,
    pub view: View,
}

/// Records and the statistics derived from them
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub country: CountryCode,
    pub records: Vec<GenerationRecord>,
    pub stats: DerivedStats,
}

/// Data shown for the current selection
#[derive(Debug, Clone, PartialEq)]
pub enum DataState {
    /// A fetch for the current selection is in flight
    Loading,
    /// Data for the current selection
    Ready(Snapshot),
    /// The fetch failed; no data is shown
    Unavailable { reason: String },
}

impl DataState {
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            DataState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// Handle for one in-flight fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    country: CountryCode,
}

impl FetchTicket {
    pub fn country(&self) -> &CountryCode {
        &self.country
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Borrowed view of everything a renderer needs
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub selection: &'a Selection,
    pub state: &'a DataState,
}

/// Dashboard session
#[derive(Debug)]
pub struct Dashboard {
    selection: Selection,
    aggregator: StatsAggregator,
    generation: u64,
    state: DataState,
}

impl Dashboard {
    pub fn new(country: CountryCode, aggregator: StatsAggregator) -> Self {
        Self {
            selection: Selection {
                country,
                view: View::default(),
            },
            aggregator,
            generation: 0,
            state: DataState::Loading,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn state(&self) -> &DataState {
        &self.state
    }

    pub fn set_view(&mut self, view: View) {
        self.selection.view = view;
    }

    pub fn context(&self) -> ViewContext<'_> {
        ViewContext {
            selection: &self.selection,
            state: &self.state,
        }
    }

    /// Select a country and issue a ticket for its fetch
    ///
    /// Any ticket issued earlier becomes stale.
    pub fn select_country(&mut self, country: CountryCode) -> FetchTicket {
        self.generation += 1;
        self.selection.country = country.clone();
        self.state = DataState::Loading;

        debug!(country = %country, generation = self.generation, "fetch issued");

        FetchTicket {
            generation: self.generation,
            country,
        }
    }

    /// Apply a fetch result
    ///
    /// Returns `false` if the ticket was superseded and the result discarded.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<GenerationRecord>, DashboardError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                country = %ticket.country,
                generation = ticket.generation,
                current = self.generation,
                "discarding superseded fetch result"
            );
            return false;
        }

        self.state = match result.and_then(|records| {
            let stats = self.aggregator.aggregate(&records)?;
            Ok((records, stats))
        }) {
            Ok((records, stats)) => DataState::Ready(Snapshot {
                country: ticket.country.clone(),
                records,
                stats,
            }),
            Err(e) => {
                warn!(country = %ticket.country, error = %e, "data unavailable");
                DataState::Unavailable {
                    reason: e.to_string(),
                }
            }
        };

        true
    }

    /// Select a country and fetch it synchronously from `source`
    pub fn load(&mut self, country: CountryCode, source: &dyn RecordSource) -> &DataState {
        let ticket = self.select_country(country);
        let result = source.fetch(ticket.country());
        self.complete(&ticket, result);
        &self.state
    }

    /// Re-fetch the currently selected country
    pub fn refresh(&mut self, source: &dyn RecordSource) -> &DataState {
        let country = self.selection.country.clone();
        self.load(country, source)
    }
}

/// Headline figures of one country, for side-by-side comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryComparison {
    pub code: CountryCode,
    pub name: String,
    /// None when the country's data is unavailable
    #[serde(rename = "totalGW")]
    pub total_gw: Option<f64>,
    #[serde(rename = "renewPercent")]
    pub renew_percent: Option<f64>,
    #[serde(rename = "resilienceScore")]
    pub resilience_score: Option<u8>,
}

/// Fetch and aggregate several countries
///
/// A failure for one country leaves its figures empty and does not affect
/// the others.
pub fn compare_countries(
    source: &dyn RecordSource,
    countries: &[CountryCode],
    aggregator: &StatsAggregator,
) -> Vec<CountryComparison> {
    countries
        .iter()
        .map(|country| {
            let stats = source
                .fetch(country)
                .and_then(|records| aggregator.aggregate(&records).map_err(DashboardError::from));

            let stats = match stats {
                Ok(stats) => Some(stats),
                Err(e) => {
                    warn!(country = %country, error = %e, "skipping country in comparison");
                    None
                }
            };

            CountryComparison {
                code: country.clone(),
                name: country.display_name().to_string(),
                total_gw: stats.as_ref().map(|s| s.total_gw),
                renew_percent: stats.as_ref().map(|s| s.renew_percent),
                resilience_score: stats.as_ref().map(|s| s.resilience_score),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::source::MemoryRecordSource;
    use chrono::{TimeZone, Utc};

    fn code(s: &str) -> CountryCode {
        CountryCode::parse(s).unwrap()
    }

    fn sample_records() -> Vec<GenerationRecord> {
        let ts = Utc.with_ymd_and_hms(2024, 10, 24, 6, 0, 0).unwrap();
        vec![
            GenerationRecord::new(ts, "Wind", Some(300.0), Some(280.0)),
            GenerationRecord::new(ts, "Coal", Some(700.0), None),
        ]
    }

    #[test]
    fn test_new_dashboard_is_loading() {
        let dashboard = Dashboard::new(code("DE"), StatsAggregator::default());
        assert_eq!(dashboard.state(), &DataState::Loading);
        assert_eq!(dashboard.selection().view, View::Dashboard);
    }

    #[test]
    fn test_complete_current_ticket() {
        let mut dashboard = Dashboard::new(code("DE"), StatsAggregator::default());
        let ticket = dashboard.select_country(code("DE"));

        assert!(dashboard.complete(&ticket, Ok(sample_records())));
        let snapshot = dashboard.state().snapshot().unwrap();
        assert_eq!(snapshot.stats.resilience_score, 28);
        assert_eq!(snapshot.records.len(), 2);
    }

    #[test]
    fn test_last_selection_wins() {
        let mut dashboard = Dashboard::new(code("DE"), StatsAggregator::default());
        let de = dashboard.select_country(code("DE"));
        let es = dashboard.select_country(code("ES"));

        assert!(dashboard.complete(&es, Ok(Vec::new())));
        assert!(!dashboard.complete(&de, Ok(sample_records())));

        let snapshot = dashboard.state().snapshot().unwrap();
        assert_eq!(snapshot.country.as_str(), "ES");
        assert_eq!(snapshot.stats, DerivedStats::default());
    }

    #[test]
    fn test_stale_result_does_not_end_loading() {
        let mut dashboard = Dashboard::new(code("DE"), StatsAggregator::default());
        let de = dashboard.select_country(code("DE"));
        let _fr = dashboard.select_country(code("FR"));

        assert!(!dashboard.complete(&de, Ok(sample_records())));
        assert_eq!(dashboard.state(), &DataState::Loading);
    }

    #[test]
    fn test_failure_is_unavailable_not_stale() {
        let mut source = MemoryRecordSource::new();
        source.insert(code("DE"), sample_records());
        source.fail(code("FR"), ApiError::NetworkError("connection refused".to_string()));

        let mut dashboard = Dashboard::new(code("DE"), StatsAggregator::default());
        assert!(dashboard.load(code("DE"), &source).snapshot().is_some());

        match dashboard.load(code("FR"), &source) {
            DataState::Unavailable { reason } => assert!(reason.contains("connection refused")),
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_records_are_unavailable() {
        let ts = Utc.with_ymd_and_hms(2024, 10, 24, 6, 0, 0).unwrap();
        let mut dashboard = Dashboard::new(code("DE"), StatsAggregator::default());
        let ticket = dashboard.select_country(code("DE"));

        dashboard.complete(
            &ticket,
            Ok(vec![GenerationRecord::new(ts, "Solar", Some(f64::NAN), None)]),
        );
        assert!(matches!(dashboard.state(), DataState::Unavailable { .. }));
    }

    #[test]
    fn test_refresh_uses_current_selection() {
        let mut source = MemoryRecordSource::new();
        source.insert(code("GB"), sample_records());

        let mut dashboard = Dashboard::new(code("GB"), StatsAggregator::default());
        dashboard.set_view(View::ResilienceStats);
        let state = dashboard.refresh(&source);
        assert_eq!(state.snapshot().unwrap().country.as_str(), "GB");

        let ctx = dashboard.context();
        assert_eq!(ctx.selection.view, View::ResilienceStats);
    }

    #[test]
    fn test_view_from_str() {
        assert_eq!("mix".parse::<View>().unwrap(), View::GenerationMix);
        assert_eq!("Regional Analysis".parse::<View>().unwrap(), View::RegionalAnalysis);
        assert_eq!("resilience-stats".parse::<View>().unwrap(), View::ResilienceStats);
        assert!("timeline".parse::<View>().is_err());
    }

    #[test]
    fn test_compare_countries() {
        let mut source = MemoryRecordSource::new();
        source.insert(code("DE"), sample_records());
        source.fail(code("FR"), ApiError::RateLimited);

        let rows = compare_countries(
            &source,
            &[code("DE"), code("FR"), code("ES")],
            &StatsAggregator::default(),
        );

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "Germany");
        assert_eq!(rows[0].total_gw, Some(1.0));
        assert_eq!(rows[0].resilience_score, Some(28));
        assert_eq!(rows[1].total_gw, None);
        assert_eq!(rows[2].total_gw, Some(0.0));
    }

    #[test]
    fn test_compare_countries_malformed_records() {
        let ts = Utc.with_ymd_and_hms(2024, 10, 24, 6, 0, 0).unwrap();
        let mut source = MemoryRecordSource::new();
        source.insert(
            code("ES"),
            vec![GenerationRecord::new(ts, "Solar", Some(-5.0), None)],
        );
        source.insert(code("DE"), sample_records());

        let rows = compare_countries(&source, &[code("ES"), code("DE")], &StatsAggregator::default());

        assert_eq!(rows[0].resilience_score, None);
        assert_eq!(rows[0].renew_percent, None);
        assert_eq!(rows[1].resilience_score, Some(28));
    }
}
