//! Text rendering of the dashboard views
//!
//! Each view reads only the [`ViewContext`] it is given. Tables are aligned
//! with `tabwriter`.

use std::io::Write;

use tabwriter::TabWriter;

use crate::charts::{chart_slices, generation_timeline, peak, TOP_RESOURCES};
use crate::dashboard::{CountryComparison, DataState, Snapshot, View, ViewContext};
use crate::error::DashboardError;
use crate::types::AlertSeverity;

const BAR_WIDTH: usize = 24;

/// Render one view, including the status header
pub fn render(view: View, ctx: &ViewContext<'_>) -> Result<String, DashboardError> {
    let mut out = String::new();
    out.push_str(&header(ctx));
    out.push('\n');

    let snapshot = match ctx.state {
        DataState::Ready(snapshot) => snapshot,
        DataState::Loading => {
            out.push_str("Awaiting ENTSO-E feed...\n");
            return Ok(out);
        }
        DataState::Unavailable { reason } => {
            out.push_str(&format!("Data unavailable: {}\n", reason));
            return Ok(out);
        }
    };

    out.push_str(&format!("== {} ==\n", view.title()));
    let body = match view {
        View::Dashboard => dashboard_view(snapshot)?,
        View::RegionalAnalysis => regional_view(snapshot)?,
        View::GenerationMix => generation_mix_view(snapshot)?,
        View::ResilienceStats => resilience_view(snapshot),
    };
    out.push_str(&body);

    Ok(out)
}

/// Render the selected view
pub fn render_selected(ctx: &ViewContext<'_>) -> Result<String, DashboardError> {
    render(ctx.selection.view, ctx)
}

/// Status line: which market is live, or why nothing is shown
fn header(ctx: &ViewContext<'_>) -> String {
    let country = &ctx.selection.country;
    let status = match ctx.state {
        DataState::Loading => "Awaiting ENTSO-E Feed...".to_string(),
        DataState::Ready(_) => format!("Live: {} Network", country.display_name()),
        DataState::Unavailable { .. } => format!("{}: data unavailable", country.display_name()),
    };
    format!("European Grid Overview | {}\n", status)
}

fn dashboard_view(snapshot: &Snapshot) -> Result<String, DashboardError> {
    let stats = &snapshot.stats;
    let mut tw = TabWriter::new(Vec::new()).padding(2);

    writeln!(tw, "Total Generation\t{} GW", stats.total_gw_display())?;
    writeln!(tw, "Renewable Share\t{} %", stats.renew_percent_display())?;
    writeln!(
        tw,
        "Forecast Error (MAE)\t{} MW",
        stats.mean_absolute_error_display()
    )?;

    writeln!(tw)?;
    writeln!(tw, "Generation Timeline (MW)")?;
    let timeline = generation_timeline(&snapshot.records);
    if timeline.is_empty() {
        writeln!(tw, "  no samples")?;
    } else {
        let max = peak(&timeline)
            .map(|p| p.actual_generation_mw)
            .unwrap_or(0.0);
        for point in &timeline {
            writeln!(
                tw,
                "  {}\t{:.1}\t{}",
                point.timestamp.format("%Y-%m-%d %H:%M"),
                point.actual_generation_mw,
                bar(ratio(point.actual_generation_mw, max))
            )?;
        }
    }

    writeln!(tw)?;
    writeln!(tw, "Top Resource Mix")?;
    for resource in stats.top_resources(TOP_RESOURCES) {
        writeln!(
            tw,
            "  {}\t{:.1} GW\t{}",
            resource.name,
            resource.total_mw / 1000.0,
            bar(ratio(resource.total_mw, stats.total_mw))
        )?;
    }

    finish(tw)
}

fn regional_view(snapshot: &Snapshot) -> Result<String, DashboardError> {
    let slices = chart_slices(&snapshot.stats, TOP_RESOURCES);
    let max = slices.iter().map(|s| s.value).fold(0.0, f64::max);
    let slice_total: f64 = slices.iter().map(|s| s.value).sum();

    let mut tw = TabWriter::new(Vec::new()).padding(2);

    writeln!(tw, "Resource Magnitude (GW)")?;
    for slice in &slices {
        writeln!(
            tw,
            "  {}\t{:.2}\t{}",
            slice.name,
            slice.value,
            bar(ratio(slice.value, max))
        )?;
    }

    writeln!(tw)?;
    writeln!(tw, "Generation Share (%)")?;
    for slice in &slices {
        writeln!(
            tw,
            "  {}\t{:.1}%",
            slice.name,
            ratio(slice.value, slice_total) * 100.0
        )?;
    }

    finish(tw)
}

fn generation_mix_view(snapshot: &Snapshot) -> Result<String, DashboardError> {
    let mut tw = TabWriter::new(Vec::new()).padding(2);

    writeln!(tw, "RESOURCE\tCATEGORY\tOUTPUT (GW)\tGRID SHARE\tSTATUS")?;
    for resource in &snapshot.stats.resource_breakdown {
        writeln!(
            tw,
            "{}\t{}\t{:.2} GW\t{:.1}%\t{}",
            resource.name,
            resource.category.label(),
            resource.gw,
            resource.percentage,
            if resource.total_mw > 0.0 {
                "Operational"
            } else {
                "Idle"
            }
        )?;
    }

    finish(tw)
}

fn resilience_view(snapshot: &Snapshot) -> String {
    let stats = &snapshot.stats;
    let mut out = format!(
        "Resilience Score: {}%  {}\nActive resource types: {}\n\n",
        stats.resilience_score,
        bar(f64::from(stats.resilience_score) / 100.0),
        stats.active_resource_count
    );

    if stats.is_stable() {
        out.push_str("Grid is Stable\n");
        return out;
    }

    for alert in &stats.alerts {
        let tag = match alert.severity {
            AlertSeverity::Warning => "WARNING",
            AlertSeverity::Critical => "CRITICAL",
        };
        out.push_str(&format!("[{}] {}: {}\n", tag, alert.title, alert.description));
    }

    out
}

/// Side-by-side table of several countries
pub fn render_comparison(rows: &[CountryComparison]) -> Result<String, DashboardError> {
    let mut tw = TabWriter::new(Vec::new()).padding(2);

    writeln!(tw, "COUNTRY\tTOTAL (GW)\tRENEWABLE\tRESILIENCE")?;
    for row in rows {
        match (row.total_gw, row.renew_percent, row.resilience_score) {
            (Some(total), Some(renew), Some(score)) => {
                writeln!(
                    tw,
                    "{} ({})\t{:.1}\t{:.0}%\t{}",
                    row.name, row.code, total, renew, score
                )?;
            }
            _ => writeln!(tw, "{} ({})\tunavailable\t-\t-", row.name, row.code)?,
        }
    }

    finish(tw)
}

fn finish(tw: TabWriter<Vec<u8>>) -> Result<String, DashboardError> {
    let bytes = tw
        .into_inner()
        .map_err(|e| DashboardError::Generic(format!("failed to flush table: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| DashboardError::Generic(e.to_string()))
}

fn ratio(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;
    use crate::dashboard::Selection;
    use crate::endpoint::CountryCode;
    use crate::types::GenerationRecord;
    use chrono::{TimeZone, Utc};

    fn selection(view: View) -> Selection {
        Selection {
            country: CountryCode::parse("DE").unwrap(),
            view,
        }
    }

    fn ready(records: Vec<GenerationRecord>) -> DataState {
        let stats = aggregate(&records).unwrap();
        DataState::Ready(Snapshot {
            country: CountryCode::parse("DE").unwrap(),
            records,
            stats,
        })
    }

    fn sample() -> Vec<GenerationRecord> {
        let ts = Utc.with_ymd_and_hms(2024, 10, 24, 6, 0, 0).unwrap();
        vec![
            GenerationRecord::new(ts, "Wind", Some(300.0), Some(280.0)),
            GenerationRecord::new(ts, "Coal", Some(700.0), None),
        ]
    }

    #[test]
    fn test_dashboard_view_cards() {
        let sel = selection(View::Dashboard);
        let state = ready(sample());
        let ctx = ViewContext {
            selection: &sel,
            state: &state,
        };

        let text = render_selected(&ctx).unwrap();
        assert!(text.contains("Live: Germany Network"));
        assert!(text.contains("Total Generation"));
        assert!(text.contains("1.0 GW"));
        assert!(text.contains("30 %"));
        assert!(text.contains("20.0 MW"));
        assert!(text.contains("2024-10-24 06:00"));
    }

    #[test]
    fn test_generation_mix_lists_all_resources() {
        let sel = selection(View::GenerationMix);
        let state = ready(sample());
        let ctx = ViewContext {
            selection: &sel,
            state: &state,
        };

        let text = render_selected(&ctx).unwrap();
        let coal = text.find("Coal").unwrap();
        let wind = text.find("Wind").unwrap();
        assert!(coal < wind);
        assert!(text.contains("70.0%"));
        assert!(text.contains("Operational"));
    }

    #[test]
    fn test_resilience_view_alerts() {
        let sel = selection(View::ResilienceStats);
        let state = ready(sample());
        let ctx = ViewContext {
            selection: &sel,
            state: &state,
        };

        let text = render_selected(&ctx).unwrap();
        assert!(text.contains("Resilience Score: 28%"));
        assert!(text.contains("[CRITICAL] Diversity Risk"));
        assert!(!text.contains("WARNING"));
        assert!(!text.contains("Grid is Stable"));
    }

    #[test]
    fn test_regional_view_shares() {
        let sel = selection(View::RegionalAnalysis);
        let state = ready(sample());
        let ctx = ViewContext {
            selection: &sel,
            state: &state,
        };

        let text = render_selected(&ctx).unwrap();
        assert!(text.contains("Resource Magnitude (GW)"));
        assert!(text.contains("0.70"));
        assert!(text.contains("30.0%"));
    }

    #[test]
    fn test_unavailable_state() {
        let sel = selection(View::Dashboard);
        let state = DataState::Unavailable {
            reason: "Network error: refused".to_string(),
        };
        let ctx = ViewContext {
            selection: &sel,
            state: &state,
        };

        let text = render_selected(&ctx).unwrap();
        assert!(text.contains("data unavailable"));
        assert!(text.contains("Network error: refused"));
        assert!(!text.contains("Total Generation"));
    }

    #[test]
    fn test_loading_state() {
        let sel = selection(View::Dashboard);
        let state = DataState::Loading;
        let ctx = ViewContext {
            selection: &sel,
            state: &state,
        };

        assert!(render_selected(&ctx).unwrap().contains("Awaiting"));
    }

    #[test]
    fn test_comparison_table() {
        let rows = vec![
            CountryComparison {
                code: CountryCode::parse("DE").unwrap(),
                name: "Germany".to_string(),
                total_gw: Some(51.2),
                renew_percent: Some(44.6),
                resilience_score: Some(74),
            },
            CountryComparison {
                code: CountryCode::parse("FR").unwrap(),
                name: "France".to_string(),
                total_gw: None,
                renew_percent: None,
                resilience_score: None,
            },
        ];

        let text = render_comparison(&rows).unwrap();
        assert!(text.contains("Germany (DE)"));
        assert!(text.contains("51.2"));
        assert!(text.contains("45%"));
        assert!(text.contains("France (FR)"));
        assert!(text.contains("unavailable"));
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.0), ".".repeat(BAR_WIDTH));
        assert_eq!(bar(1.0), "#".repeat(BAR_WIDTH));
        assert_eq!(bar(2.0).len(), BAR_WIDTH);
    }
}
