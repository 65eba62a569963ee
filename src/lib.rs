//! Energy Resilience Stats - generation statistics for European power grids
//!
//! Turns ENTSO-E style generation records (timestamp, resource type, actual
//! and forecast output in MW) into the figures a grid overview dashboard shows:
//! total generation, renewable share, forecast accuracy, per-resource
//! breakdown, a resilience score and advisory alerts.
//!
//! # Features
//! - Validated record ingestion from JSON or CSV (non-numeric and negative values rejected)
//! - Pure aggregation into [`DerivedStats`] with configurable scoring coefficients
//! - Enumerated ENTSO-E classification (keyword matching available as a mode)
//! - Record sources: local energy data API over HTTP, files, in-memory
//! - Dashboard state with stale-fetch protection and four text views
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use energy_resilience_stats::{aggregate, AlertSeverity, GenerationRecord};
//!
//! let ts = Utc.with_ymd_and_hms(2024, 10, 24, 6, 0, 0).unwrap();
//! let records = vec![
//!     GenerationRecord::new(ts, "Wind", Some(300.0), Some(280.0)),
//!     GenerationRecord::new(ts, "Coal", Some(700.0), None),
//! ];
//!
//! let stats = aggregate(&records).unwrap();
//! assert_eq!(stats.total_mw, 1000.0);
//! assert_eq!(stats.resilience_score, 28);
//! assert_eq!(stats.alerts_of(AlertSeverity::Critical).count(), 1);
//! ```

pub mod aggregator;
pub mod charts;
pub mod classification;
pub mod config;
pub mod csv_parser;
pub mod csv_utils;
pub mod dashboard;
pub mod endpoint;
mod error;
pub mod report;
pub mod source;
mod types;
pub mod validation;

// Re-export public types for easier access
pub use aggregator::{aggregate, AggregatorConfig, StatsAggregator};
pub use classification::{ClassificationMode, ResourceCategory};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DataState, View};
pub use endpoint::CountryCode;
pub use error::{ApiError, ConfigError, DashboardError, ValidationError};
pub use source::{FileRecordSource, HttpRecordSource, MemoryRecordSource, RecordSource};
pub use types::{
    Alert, AlertSeverity, DerivedStats, GenerationRecord, ResourceShare, TimelinePoint,
};
