//! Output formatting and persistence for ingested data.
//!
//! Supports pretty-printing, JSON rendering, and normalized CSV export.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::parser::RATE_PERCENT_THRESHOLD;
use crate::schema::{ColumnSpec, DecodeKind, LEADING_COLUMNS, SCHEMA};
use crate::series::Series;
use crate::stats::SummaryRollup;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;

/// Logs a rollup using Rust's debug pretty-print format.
pub fn print_pretty(summary: &SummaryRollup) {
    debug!("{:#?}", summary);
}

/// Renders any snapshot value as pretty-printed JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Header row of a normalized export: `date`, `weekday`, then one column
/// per schema entry.
pub fn header() -> Vec<String> {
    let mut names = Vec::with_capacity(LEADING_COLUMNS + SCHEMA.len());
    names.push("date".to_string());
    names.push("weekday".to_string());
    names.extend(SCHEMA.iter().map(|c| c.name()));
    names
}

/// Writes `series` as CSV in the positional source layout, so the output
/// can be ingested again.
pub fn write_series<W: Write>(w: W, series: &Series) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(w);

    writer.write_record(header())?;
    for record in series {
        let mut row = Vec::with_capacity(LEADING_COLUMNS + SCHEMA.len());
        row.push(record.date.clone());
        row.push(record.weekday.clone());
        row.extend(
            SCHEMA
                .iter()
                .map(|c| encode_cell(c, record.value(c.scope, c.metric))),
        );
        writer.write_record(&row)?;
    }
    writer.flush()?;

    Ok(())
}

/// A rate above the percent threshold would be divided again on re-ingest,
/// so it is written with an explicit `%`.
fn encode_cell(column: &ColumnSpec, value: f64) -> String {
    match column.kind {
        DecodeKind::Rate if value > RATE_PERCENT_THRESHOLD => format!("{}%", value * 100.0),
        _ => value.to_string(),
    }
}

/// Writes a normalized export to `path`, replacing any existing file.
pub fn export_series(path: &str, series: &Series) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create '{path}'"))?;
    write_series(file, series)?;

    info!(path, records = series.len(), "Series exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{build_series, ingest};
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&SummaryRollup::default());
    }

    #[test]
    fn test_to_json_uses_field_names() {
        let (series, summary) = ingest("2025-06-16,Mon,10,2\n");
        let json = to_json(&summary).unwrap();
        assert!(json.contains("\"total_spend\": 10.0"));

        let json = to_json(&series).unwrap();
        assert!(json.trim_start().starts_with('['));
        assert!(json.contains("\"channel_b\""));
    }

    #[test]
    fn test_header_has_36_columns() {
        let header = header();
        assert_eq!(header.len(), 36);
        assert_eq!(header[2], "overall_spend");
        assert_eq!(header[6], "overall_cost_per_install");
        assert_eq!(header[14], "channel_a_spend");
    }

    #[test]
    fn test_export_reingests_to_same_series() {
        let path = temp_path("campaign_stats_test_export.csv");
        let _ = fs::remove_file(&path);

        let series = build_series(
            "2025-06-17,Tue,\"2,428.20\",202,225,111.39%,12.02,10.79,0.4,0.47,0.49,0.0372,0.0434,0.0455,\
327.55,125,135,1.08,2.43,0.12,0.12,0.12,0.0487,0.0487,0.0487,\
2100.65,77,90,1.1688,23.34,0.83,0.99,1.05,0.0354,0.0426,0.0455\n\
2025-06-16,Mon,2200,180,200,1.11,0,11,0.38,0.45,0.48,0.035,0.042,0.044\n",
        );
        export_series(&path, &series).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("date,weekday,overall_spend"));
        assert_eq!(content.lines().count(), 3);
        assert_eq!(build_series(&content), series);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_export_keeps_rates_above_threshold() {
        let series = build_series(
            "2025-06-17,Tue,100,10,500,2000%\n2025-06-16,Mon,100,10,500,5000\n",
        );
        assert_eq!(series[0].overall.registration_rate, 50.0);
        assert_eq!(series[1].overall.registration_rate, 20.0);

        let mut buf = Vec::new();
        write_series(&mut buf, &series).unwrap();
        let content = String::from_utf8(buf).unwrap();
        assert!(content.lines().nth(1).unwrap().contains(",5000%,"));

        let again = build_series(&content);
        assert_eq!(again.len(), 2);
        for (a, b) in again.iter().zip(series.iter()) {
            assert_eq!(a.date, b.date);
            assert!((a.overall.registration_rate - b.overall.registration_rate).abs() < 1e-9);
            assert_eq!(a.overall.registrations, b.overall.registrations);
        }
    }

    #[test]
    fn test_export_empty_series_writes_header_only() {
        let mut buf = Vec::new();
        write_series(&mut buf, &Series::default()).unwrap();

        let content = String::from_utf8(buf).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
