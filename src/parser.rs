//! Row decoding for campaign performance exports.
//!
//! Every function here is total: a cell that cannot be read as a number
//! becomes `0.0` and a short line leaves its trailing metrics at `0.0`.

use csv::ReaderBuilder;

use crate::record::DailyRecord;
use crate::schema::{DecodeKind, LEADING_COLUMNS, SCHEMA};

/// Plain rate values above this are read as percentages (`50` means 50%).
///
/// Exports mix fractional rates (`1.11` = 111%) with percentage-style
/// integers. Realistic registration rates top out around 2.0, so anything
/// above 10 is taken to be a percentage. A genuine rate above 1000% would be
/// misread by this rule.
pub const RATE_PERCENT_THRESHOLD: f64 = 10.0;

/// Decodes a numeric cell such as `"2,200.00"`, `'180'` or `3.5%`.
///
/// Quotes and thousands separators are stripped along with a trailing `%`;
/// the longest leading number is parsed. Empty, non-numeric and non-finite
/// input yields `0.0`.
pub fn parse_number(cell: &str) -> f64 {
    let cleaned: String = cell
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | ','))
        .collect();
    let cleaned = cleaned.trim().trim_end_matches('%');

    match leading_number(cleaned).parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Decodes a registration-rate cell into a fraction.
///
/// `"50%"` and `"50"` both give `0.5`; `"1.11"` and `"5"` are kept as-is.
/// See [`RATE_PERCENT_THRESHOLD`].
pub fn parse_rate(cell: &str) -> f64 {
    let value = parse_number(cell);
    if cell.contains('%') || value > RATE_PERCENT_THRESHOLD {
        value / 100.0
    } else {
        value
    }
}

/// Splits a data line into fields, honouring quoted cells like `"2,200.00"`.
///
/// Falls back to a plain comma split if the line is not valid CSV.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    match rdr.records().next() {
        Some(Ok(record)) => record.iter().map(str::to_string).collect(),
        _ => line.split(',').map(str::to_string).collect(),
    }
}

/// Builds a [`DailyRecord`] from already-split fields.
///
/// Missing columns decode as empty cells.
pub fn parse_fields(fields: &[String]) -> DailyRecord {
    let cell = |idx: usize| fields.get(idx).map(String::as_str).unwrap_or("");

    let mut record = DailyRecord {
        date: cell(0).trim().to_string(),
        weekday: cell(1).trim().to_string(),
        ..Default::default()
    };

    for (offset, column) in SCHEMA.iter().enumerate() {
        let raw = cell(LEADING_COLUMNS + offset);
        let value = match column.kind {
            DecodeKind::Number => parse_number(raw),
            DecodeKind::Rate => parse_rate(raw),
        };
        record.scope_mut(column.scope).set(column.metric, value);
    }

    record
}

/// Decodes one raw line into a [`DailyRecord`].
pub fn parse_line(line: &str) -> DailyRecord {
    parse_fields(&split_fields(line))
}

/// Returns the longest prefix of `s` that reads as a decimal float.
fn leading_number(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return "";
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::COLUMN_COUNT;

    #[test]
    fn test_parse_number_strips_separators_and_quotes() {
        assert_eq!(parse_number("\"2,200.00\""), 2200.0);
        assert_eq!(parse_number("'180'"), 180.0);
        assert_eq!(parse_number("1,234,567"), 1234567.0);
        assert_eq!(parse_number(" 3.5% "), 3.5);
    }

    #[test]
    fn test_parse_number_degrades_to_zero() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("-"), 0.0);
        assert_eq!(parse_number("n/a"), 0.0);
        assert_eq!(parse_number("NaN"), 0.0);
        assert_eq!(parse_number("inf"), 0.0);
        assert_eq!(parse_number("."), 0.0);
    }

    #[test]
    fn test_parse_number_reads_leading_number() {
        assert_eq!(parse_number("12.5 USD"), 12.5);
        assert_eq!(parse_number("-0.25"), -0.25);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("1e3"), 1000.0);
        assert_eq!(parse_number("7e"), 7.0);
    }

    #[test]
    fn test_parse_rate_boundaries() {
        assert_eq!(parse_rate("50"), 0.5);
        assert_eq!(parse_rate("5"), 5.0);
        assert_eq!(parse_rate("50%"), 0.5);
        assert_eq!(parse_rate("1.11"), 1.11);
        // the threshold itself is not above 10
        assert_eq!(parse_rate("10"), 10.0);
        assert!((parse_rate("111.39%") - 1.1139).abs() < 1e-12);
        assert_eq!(parse_rate(""), 0.0);
    }

    #[test]
    fn test_split_fields_keeps_quoted_thousands_together() {
        let fields = split_fields(r#"2025-06-16,Mon,"2,200.00",180"#);
        assert_eq!(fields, vec!["2025-06-16", "Mon", "2,200.00", "180"]);
    }

    #[test]
    fn test_split_fields_falls_back_on_bad_quotes() {
        let fields = split_fields("2025-06-16,Mon,\"12\"x,3");
        assert!(fields.len() >= 3);
        assert_eq!(fields[0], "2025-06-16");
    }

    #[test]
    fn test_parse_line_maps_every_scope() {
        let record = parse_line(&full_line());

        assert_eq!(record.date, "2025-06-17");
        assert_eq!(record.weekday, "Tue");

        assert_eq!(record.overall.spend, 2428.2);
        assert_eq!(record.overall.installs, 202.0);
        assert_eq!(record.overall.registrations, 225.0);
        assert_eq!(record.overall.registration_rate, 1.1139);
        assert_eq!(record.overall.cost_per_install, 12.02);
        assert_eq!(record.overall.cost_per_action, 10.79);
        assert_eq!(record.overall.roi_day7, 0.0455);

        assert_eq!(record.channel_a.spend, 327.55);
        assert_eq!(record.channel_a.registration_rate, 1.08);
        assert_eq!(record.channel_a.cost_per_install, 0.0);
        assert_eq!(record.channel_a.cost_per_action, 2.43);
        assert_eq!(record.channel_a.roi_day7, 0.0487);

        assert_eq!(record.channel_b.spend, 2100.65);
        assert_eq!(record.channel_b.registration_rate, 0.5);
        assert_eq!(record.channel_b.cost_per_action, 23.34);
        assert_eq!(record.channel_b.roi_day1, 0.0354);
    }

    #[test]
    fn test_parse_line_short_row_zero_fills() {
        let record = parse_line("2025-06-16,Mon,100");

        assert_eq!(record.overall.spend, 100.0);
        assert_eq!(record.overall.installs, 0.0);
        assert_eq!(record.channel_b.roi_day7, 0.0);
    }

    #[test]
    fn test_parse_line_all_fields_finite() {
        let line = format!("2025-06-16,Mon,{}", vec!["garbage"; COLUMN_COUNT].join(","));
        let record = parse_line(&line);

        for scope in crate::schema::Scope::ALL {
            for column in SCHEMA.iter().filter(|c| c.scope == scope) {
                let v = record.value(scope, column.metric);
                assert!(v.is_finite());
                assert_eq!(v, 0.0);
            }
        }
    }

    // Helper functions for tests
    fn full_line() -> String {
        [
            "2025-06-17", "Tue",
            // overall
            "\"2,428.20\"", "202", "225", "1.1139", "12.02", "10.79", "0.40", "0.47", "0.49",
            "0.0372", "0.0434", "0.0455",
            // channel a
            "327.55", "125", "135", "1.08", "2.43", "0.12", "0.12", "0.12", "0.0487", "0.0487",
            "0.0487",
            // channel b
            "2100.65", "77", "90", "50%", "23.34", "0.83", "0.99", "1.05", "0.0354", "0.0426",
            "0.0455",
        ]
        .join(",")
    }
}
