//! Rule-based, local descriptions of a series for display next to charts.
//!
//! Nothing here feeds back into the data model; it only reads a [`Series`]
//! or a [`SummaryRollup`] and produces text.

use std::fmt;

use serde::Serialize;

use crate::format;
use crate::schema::{Metric, Scope};
use crate::series::Series;
use crate::stats::SummaryRollup;

/// Metrics summarised under each scope's panel group.
pub const PANEL_METRICS: [Metric; 4] = [
    Metric::Spend,
    Metric::RegistrationRate,
    Metric::LtvDay7,
    Metric::RoiDay7,
];

/// Relative move between first and last value that counts as a trend.
const TREND_BAND: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
    /// Only one data point.
    Steady,
}

impl Trend {
    /// Compares the last value to the first with a ±10% band.
    pub fn between(first: f64, last: f64) -> Self {
        if last > first * (1.0 + TREND_BAND) {
            Trend::Rising
        } else if last < first * (1.0 - TREND_BAND) {
            Trend::Falling
        } else {
            Trend::Stable
        }
    }

    fn sentence(self) -> &'static str {
        match self {
            Trend::Rising => "It shows a clear upward trend recently.",
            Trend::Falling => "It shows a downward trend recently.",
            Trend::Stable => "It stays within a relatively stable range overall.",
            Trend::Steady => "The data is fairly steady.",
        }
    }
}

/// Mean, peak and direction of one metric over a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDigest {
    pub scope: Scope,
    pub metric: Metric,
    pub average: f64,
    pub peak: f64,
    pub peak_date: String,
    pub trend: Trend,
}

impl MetricDigest {
    /// `None` for an empty series.
    pub fn compute(series: &Series, scope: Scope, metric: Metric) -> Option<Self> {
        let values: Vec<f64> = series.iter().map(|r| r.value(scope, metric)).collect();
        let (first, last) = (*values.first()?, *values.last()?);

        let peak = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // first day reaching the peak
        let peak_date = series
            .iter()
            .zip(&values)
            .find(|(_, v)| **v == peak)
            .map(|(r, _)| r.date.clone())
            .unwrap_or_default();

        let trend = if values.len() > 1 {
            Trend::between(first, last)
        } else {
            Trend::Steady
        };

        Some(Self {
            scope,
            metric,
            average: mean(&values),
            peak,
            peak_date,
            trend,
        })
    }
}

impl fmt::Display for MetricDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = self.metric.unit();
        write!(
            f,
            "Over this period the average {} was {}. It peaked on {} at {}. {}",
            self.metric.label(),
            format::with_unit(self.average, unit),
            self.peak_date,
            format::with_unit(self.peak, unit),
            self.trend.sentence()
        )
    }
}

/// Digest text for one metric, or a no-data notice.
pub fn describe(series: &Series, scope: Scope, metric: Metric) -> String {
    match MetricDigest::compute(series, scope, metric) {
        Some(digest) => digest.to_string(),
        None => "No data available for analysis.".to_string(),
    }
}

/// Digests of the [`PANEL_METRICS`] for a scope; empty for an empty series.
pub fn scope_digests(series: &Series, scope: Scope) -> Vec<MetricDigest> {
    PANEL_METRICS
        .iter()
        .filter_map(|&m| MetricDigest::compute(series, scope, m))
        .collect()
}

/// A labelled, formatted headline figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub title: &'static str,
    pub value: String,
}

/// The six overall headline cards.
pub fn kpi_cards(summary: &SummaryRollup) -> Vec<KpiCard> {
    vec![
        KpiCard { title: "Total spend", value: format::currency(summary.total_spend) },
        KpiCard { title: "Total installs", value: format::number(summary.total_installs) },
        KpiCard { title: "Total registrations", value: format::number(summary.total_registrations) },
        KpiCard { title: "Registration rate", value: format::percent(summary.avg_registration_rate) },
        KpiCard { title: "Overall CPI", value: format::currency(summary.avg_cost_per_install) },
        KpiCard { title: "Day-1 ROI", value: format::percent(summary.avg_roi_day1) },
    ]
}

/// Arithmetic mean; `0.0` for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
