//! Chart series derived from records and statistics
//!
//! - `generation_timeline`: summed actual output per timestamp (the
//!   "Generation Timeline (MW)" area chart)
//! - `chart_slices`: top resources in GW for the bar and pie charts

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{DerivedStats, GenerationRecord, TimelinePoint};

/// Number of resources shown in the top-resource charts
pub const TOP_RESOURCES: usize = 5;

/// One bar / pie slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub name: String,
    /// Output in GW (2 decimals)
    pub value: f64,
}

/// Sum actual (and forecast) output per timestamp, ascending by time
///
/// Forecast sums only include records that carry a forecast; a timestamp with
/// no forecasts at all has `forecast_generation_mw == None`.
///
/// # Examples
///
/// ```
/// # use energy_resilience_stats::{charts::generation_timeline, GenerationRecord};
/// # use chrono::{TimeZone, Utc};
/// let t0 = Utc.with_ymd_and_hms(2024, 10, 24, 6, 0, 0).unwrap();
/// let t1 = Utc.with_ymd_and_hms(2024, 10, 24, 7, 0, 0).unwrap();
/// let records = vec![
///     GenerationRecord::new(t1, "Solar", Some(50.0), None),
///     GenerationRecord::new(t0, "Solar", Some(10.0), None),
///     GenerationRecord::new(t0, "Wind", Some(30.0), Some(25.0)),
/// ];
///
/// let timeline = generation_timeline(&records);
/// assert_eq!(timeline.len(), 2);
/// assert_eq!(timeline[0].timestamp, t0);
/// assert_eq!(timeline[0].actual_generation_mw, 40.0);
/// assert_eq!(timeline[0].forecast_generation_mw, Some(25.0));
/// assert_eq!(timeline[1].forecast_generation_mw, None);
/// ```
pub fn generation_timeline(records: &[GenerationRecord]) -> Vec<TimelinePoint> {
    let mut buckets: BTreeMap<DateTime<Utc>, (f64, Option<f64>)> = BTreeMap::new();

    for record in records {
        let entry = buckets.entry(record.timestamp).or_insert((0.0, None));
        entry.0 += record.actual_mw();
        if let Some(forecast) = record.forecast_generation_mw {
            entry.1 = Some(entry.1.unwrap_or(0.0) + forecast);
        }
    }

    buckets
        .into_iter()
        .map(|(timestamp, (actual, forecast))| TimelinePoint {
            timestamp,
            actual_generation_mw: actual,
            forecast_generation_mw: forecast,
        })
        .collect()
}

/// Largest resources as chart slices
pub fn chart_slices(stats: &DerivedStats, n: usize) -> Vec<ChartSlice> {
    stats
        .top_resources(n)
        .iter()
        .map(|r| ChartSlice {
            name: r.name.clone(),
            value: r.gw,
        })
        .collect()
}

/// Peak of the timeline, if any
pub fn peak(timeline: &[TimelinePoint]) -> Option<&TimelinePoint> {
    timeline
        .iter()
        .max_by(|a, b| a.actual_generation_mw.total_cmp(&b.actual_generation_mw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;
    use chrono::{Duration, TimeZone};

    fn t(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 24, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    #[test]
    fn test_timeline_empty() {
        assert!(generation_timeline(&[]).is_empty());
    }

    #[test]
    fn test_timeline_sorted_and_summed() {
        let records = vec![
            GenerationRecord::new(t(30), "Nuclear", Some(100.0), None),
            GenerationRecord::new(t(15), "Nuclear", Some(90.0), None),
            GenerationRecord::new(t(15), "Solar", None, None),
            GenerationRecord::new(t(0), "Nuclear", Some(80.0), Some(85.0)),
            GenerationRecord::new(t(0), "Solar", Some(5.0), Some(0.0)),
        ];

        let timeline = generation_timeline(&records);
        let values: Vec<f64> = timeline.iter().map(|p| p.actual_generation_mw).collect();
        assert_eq!(values, vec![85.0, 90.0, 100.0]);
        assert_eq!(timeline[0].forecast_generation_mw, Some(85.0));
        assert_eq!(timeline[1].forecast_generation_mw, None);
    }

    #[test]
    fn test_peak() {
        let records = vec![
            GenerationRecord::new(t(0), "Wind", Some(10.0), None),
            GenerationRecord::new(t(15), "Wind", Some(70.0), None),
            GenerationRecord::new(t(30), "Wind", Some(20.0), None),
        ];
        let timeline = generation_timeline(&records);
        assert_eq!(peak(&timeline).map(|p| p.timestamp), Some(t(15)));
        assert!(peak(&[]).is_none());
    }

    #[test]
    fn test_chart_slices_top_five() {
        let records: Vec<GenerationRecord> = (1..=7)
            .map(|i| GenerationRecord::new(t(0), format!("Unit {}", i), Some(i as f64 * 1000.0), None))
            .collect();
        let stats = aggregate(&records).unwrap();

        let slices = chart_slices(&stats, TOP_RESOURCES);
        assert_eq!(slices.len(), 5);
        assert_eq!(slices[0].name, "Unit 7");
        assert_eq!(slices[0].value, 7.0);
        assert_eq!(slices[4].name, "Unit 3");
    }
}
