//! Display formatting for KPI values.

use crate::schema::Unit;

/// `$1234.50`
pub fn currency(v: f64) -> String {
    format!("${:.2}", v)
}

/// Groups the integer part with commas: `1234567.5` -> `1,234,567.5`.
///
/// Up to three fractional digits are kept, trailing zeros dropped.
pub fn number(v: f64) -> String {
    let sign = if v < 0.0 { "-" } else { "" };
    let fixed = format!("{:.3}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac = frac_part.trim_end_matches('0');
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// Fraction as a percentage: `0.0372` -> `3.72%`.
pub fn percent(v: f64) -> String {
    format!("{:.2}%", v * 100.0)
}

pub fn decimal(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn with_unit(v: f64, unit: Unit) -> String {
    match unit {
        Unit::Currency => currency(v),
        Unit::Percent => percent(v),
        Unit::Decimal => decimal(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_and_decimal() {
        assert_eq!(currency(2200.0), "$2200.00");
        assert_eq!(currency(0.0), "$0.00");
        assert_eq!(decimal(12.0234), "12.02");
    }

    #[test]
    fn test_number_grouping() {
        assert_eq!(number(0.0), "0");
        assert_eq!(number(180.0), "180");
        assert_eq!(number(1234.0), "1,234");
        assert_eq!(number(1234567.5), "1,234,567.5");
        assert_eq!(number(-9876.0), "-9,876");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.0372), "3.72%");
        assert_eq!(percent(1.1139), "111.39%");
        assert_eq!(with_unit(0.5, Unit::Percent), "50.00%");
    }
}
