use serde::Serialize;

use crate::schema::Scope;
use crate::series::Series;

/// Totals and derived rates for one scope of a [`Series`].
///
/// Always recomputed from the series, never stored on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryRollup {
    pub total_spend: f64,
    pub total_installs: f64,
    pub total_registrations: f64,

    // derived
    pub avg_registration_rate: f64,
    pub avg_cost_per_install: f64,
    pub avg_roi_day1: f64,
}

impl SummaryRollup {
    /// Rollup of the overall scope.
    pub fn from_series(series: &Series) -> Self {
        Self::for_scope(series, Scope::Overall)
    }

    /// Same formulas applied to any scope.
    pub fn for_scope(series: &Series, scope: Scope) -> Self {
        let mut s = SummaryRollup::default();

        let mut roi_sum = 0.0;
        let mut roi_days = 0usize;

        for record in series {
            let m = record.scope(scope);

            s.total_spend += m.spend;
            s.total_installs += m.installs;
            s.total_registrations += m.registrations;

            // only days that actually reported a return count towards the mean
            if m.roi_day1 > 0.0 {
                roi_sum += m.roi_day1;
                roi_days += 1;
            }
        }

        s.avg_registration_rate = Self::ratio(s.total_registrations, s.total_installs);
        s.avg_cost_per_install = Self::ratio(s.total_spend, s.total_installs);
        s.avg_roi_day1 = if roi_days == 0 {
            0.0
        } else {
            roi_sum / roi_days as f64
        };

        s
    }

    /// `part / total`, or `0.0` when `total` is zero.
    pub fn ratio(part: f64, total: f64) -> f64 {
        if total == 0.0 { 0.0 } else { part / total }
    }
}
