//! Positional column layout of a campaign performance export.
//!
//! The export carries no usable header names, so every column is identified
//! by its position. The layout lives here as data: one [`ColumnSpec`] per
//! metric column, consumed in order by the row decoder and the CSV exporter.

use serde::Serialize;

/// Number of leading identity columns (`date`, `weekday`) before the metrics.
pub const LEADING_COLUMNS: usize = 2;

/// Number of metric columns across all three scopes.
pub const METRIC_COLUMNS: usize = 34;

/// Total column count of a well-formed data line.
pub const COLUMN_COUNT: usize = LEADING_COLUMNS + METRIC_COLUMNS;

/// First-field markers of a totals/summary row.
pub const TOTAL_MARKERS: &[&str] = &["汇总", "合计", "Total", "Summary"];

/// First-field markers of a (possibly repeated) header row.
pub const HEADER_MARKERS: &[&str] = &["日期", "Date"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Overall,
    ChannelA,
    ChannelB,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Overall, Scope::ChannelA, Scope::ChannelB];

    pub fn key(self) -> &'static str {
        match self {
            Scope::Overall => "overall",
            Scope::ChannelA => "channel_a",
            Scope::ChannelB => "channel_b",
        }
    }
}

/// How a metric value is rendered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Currency,
    Percent,
    Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Spend,
    Installs,
    Registrations,
    RegistrationRate,
    CostPerInstall,
    CostPerAction,
    LtvDay1,
    LtvDay3,
    LtvDay7,
    RoiDay1,
    RoiDay3,
    RoiDay7,
}

impl Metric {
    pub fn key(self) -> &'static str {
        match self {
            Metric::Spend => "spend",
            Metric::Installs => "installs",
            Metric::Registrations => "registrations",
            Metric::RegistrationRate => "registration_rate",
            Metric::CostPerInstall => "cost_per_install",
            Metric::CostPerAction => "cost_per_action",
            Metric::LtvDay1 => "ltv_day1",
            Metric::LtvDay3 => "ltv_day3",
            Metric::LtvDay7 => "ltv_day7",
            Metric::RoiDay1 => "roi_day1",
            Metric::RoiDay3 => "roi_day3",
            Metric::RoiDay7 => "roi_day7",
        }
    }

    /// Human-readable label used in narrative text.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Spend => "spend",
            Metric::Installs => "installs",
            Metric::Registrations => "registrations",
            Metric::RegistrationRate => "registration rate",
            Metric::CostPerInstall => "CPI",
            Metric::CostPerAction => "CPA",
            Metric::LtvDay1 => "day-1 LTV",
            Metric::LtvDay3 => "day-3 LTV",
            Metric::LtvDay7 => "day-7 LTV",
            Metric::RoiDay1 => "day-1 ROI",
            Metric::RoiDay3 => "day-3 ROI",
            Metric::RoiDay7 => "day-7 ROI",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            Metric::Spend
            | Metric::CostPerInstall
            | Metric::CostPerAction
            | Metric::LtvDay1
            | Metric::LtvDay3
            | Metric::LtvDay7 => Unit::Currency,
            Metric::RegistrationRate | Metric::RoiDay1 | Metric::RoiDay3 | Metric::RoiDay7 => {
                Unit::Percent
            }
            Metric::Installs | Metric::Registrations => Unit::Decimal,
        }
    }
}

/// Which decoder a cell goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeKind {
    Number,
    /// Registration rate, subject to the fraction-vs-percentage heuristic.
    Rate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub scope: Scope,
    pub metric: Metric,
    pub kind: DecodeKind,
}

impl ColumnSpec {
    const fn num(scope: Scope, metric: Metric) -> Self {
        Self {
            scope,
            metric,
            kind: DecodeKind::Number,
        }
    }

    const fn rate(scope: Scope) -> Self {
        Self {
            scope,
            metric: Metric::RegistrationRate,
            kind: DecodeKind::Rate,
        }
    }

    /// Column name used in normalized exports, e.g. `channel_a_roi_day7`.
    pub fn name(&self) -> String {
        format!("{}_{}", self.scope.key(), self.metric.key())
    }
}

use Metric::*;
use Scope::*;

/// Metric columns in source order, starting right after `weekday`.
///
/// Only the overall block carries `cost_per_install`; the channel blocks
/// go straight from registration rate to CPA.
pub static SCHEMA: [ColumnSpec; METRIC_COLUMNS] = [
    ColumnSpec::num(Overall, Spend),
    ColumnSpec::num(Overall, Installs),
    ColumnSpec::num(Overall, Registrations),
    ColumnSpec::rate(Overall),
    ColumnSpec::num(Overall, CostPerInstall),
    ColumnSpec::num(Overall, CostPerAction),
    ColumnSpec::num(Overall, LtvDay1),
    ColumnSpec::num(Overall, LtvDay3),
    ColumnSpec::num(Overall, LtvDay7),
    ColumnSpec::num(Overall, RoiDay1),
    ColumnSpec::num(Overall, RoiDay3),
    ColumnSpec::num(Overall, RoiDay7),
    ColumnSpec::num(ChannelA, Spend),
    ColumnSpec::num(ChannelA, Installs),
    ColumnSpec::num(ChannelA, Registrations),
    ColumnSpec::rate(ChannelA),
    ColumnSpec::num(ChannelA, CostPerAction),
    ColumnSpec::num(ChannelA, LtvDay1),
    ColumnSpec::num(ChannelA, LtvDay3),
    ColumnSpec::num(ChannelA, LtvDay7),
    ColumnSpec::num(ChannelA, RoiDay1),
    ColumnSpec::num(ChannelA, RoiDay3),
    ColumnSpec::num(ChannelA, RoiDay7),
    ColumnSpec::num(ChannelB, Spend),
    ColumnSpec::num(ChannelB, Installs),
    ColumnSpec::num(ChannelB, Registrations),
    ColumnSpec::rate(ChannelB),
    ColumnSpec::num(ChannelB, CostPerAction),
    ColumnSpec::num(ChannelB, LtvDay1),
    ColumnSpec::num(ChannelB, LtvDay3),
    ColumnSpec::num(ChannelB, LtvDay7),
    ColumnSpec::num(ChannelB, RoiDay1),
    ColumnSpec::num(ChannelB, RoiDay3),
    ColumnSpec::num(ChannelB, RoiDay7),
];
