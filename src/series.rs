//! Series building: finds the data region of an export and turns it into an
//! ascending sequence of [`DailyRecord`]s.

use std::ops::Deref;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::parser::{parse_fields, split_fields};
use crate::record::DailyRecord;
use crate::schema::{HEADER_MARKERS, TOTAL_MARKERS};
use crate::stats::SummaryRollup;

/// Daily records in ascending date order.
///
/// Read-only once built: it derefs to a slice but hands out no mutable
/// access.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series(Vec<DailyRecord>);

impl Series {
    /// Orders `records` ascending, assuming they are already monotonic.
    ///
    /// Only the endpoints are compared: if the first date is after the last
    /// the whole list is reversed, otherwise it is kept as given. An endpoint
    /// that is not a calendar date (`2025-02-30`) also keeps the given order.
    pub fn from_records(mut records: Vec<DailyRecord>) -> Self {
        let descending = match (records.first(), records.last()) {
            (Some(first), Some(last)) => date_after(&first.date, &last.date),
            _ => false,
        };
        if descending {
            debug!(records = records.len(), "Source is descending, reversing");
            records.reverse();
        }
        Self(records)
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.0
    }

    /// The last `n` records (or all of them if there are fewer).
    pub fn recent(&self, n: usize) -> &[DailyRecord] {
        let start = self.0.len().saturating_sub(n);
        &self.0[start..]
    }
}

impl Deref for Series {
    type Target = [DailyRecord];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a DailyRecord;
    type IntoIter = std::slice::Iter<'a, DailyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Builds a [`Series`] from the full text of an export.
///
/// A leading byte-order mark is dropped. Everything before the first line
/// starting with `YYYY-MM-DD` is ignored.
/// After that, lines whose first field is empty or carries a totals/header
/// marker are skipped. Text without any dated line gives an empty series.
pub fn build_series(raw: &str) -> Series {
    let lines: Vec<&str> = raw
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let Some(start) = lines.iter().position(|l| starts_with_date(l)) else {
        debug!(lines = lines.len(), "No dated line found");
        return Series::default();
    };

    let mut records = Vec::with_capacity(lines.len() - start);
    for line in &lines[start..] {
        let fields = split_fields(line);
        let first = fields.first().map(|f| f.trim()).unwrap_or("");

        if first.is_empty() {
            continue;
        }
        if TOTAL_MARKERS.iter().any(|m| first.contains(m)) {
            debug!(line = %first, "Skipping totals row");
            continue;
        }
        if HEADER_MARKERS.iter().any(|m| first.contains(m)) {
            debug!(line = %first, "Skipping repeated header row");
            continue;
        }

        records.push(parse_fields(&fields));
    }

    Series::from_records(records)
}

/// Ingests an export into its series and overall rollup.
///
/// Never fails; malformed input degrades to an empty or zero-filled result.
pub fn ingest(raw: &str) -> (Series, SummaryRollup) {
    let series = build_series(raw);
    let summary = SummaryRollup::from_series(&series);

    info!(
        records = series.len(),
        first = series.first().map(|r| r.date.as_str()).unwrap_or("-"),
        last = series.last().map(|r| r.date.as_str()).unwrap_or("-"),
        total_spend = summary.total_spend,
        "Export ingested"
    );

    (series, summary)
}

/// True if `line` begins with four digits, `-`, two digits, `-`, two digits.
pub fn starts_with_date(line: &str) -> bool {
    let b = line.as_bytes();
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

/// `a` is strictly after `b`; false when either side is not a real date.
fn date_after(a: &str, b: &str) -> bool {
    match (parse_date(a), parse_date(b)) {
        (Some(a), Some(b)) => a > b,
        _ => false,
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let head = s.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
