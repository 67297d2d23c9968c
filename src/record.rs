//! Per-day campaign records.

use serde::Serialize;

use crate::schema::{Metric, Scope};

/// The twelve metrics tracked for one scope on one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScopeMetrics {
    pub spend: f64,
    pub installs: f64,
    pub registrations: f64,
    pub registration_rate: f64,
    pub cost_per_install: f64,
    pub cost_per_action: f64,
    pub ltv_day1: f64,
    pub ltv_day3: f64,
    pub ltv_day7: f64,
    pub roi_day1: f64,
    pub roi_day3: f64,
    pub roi_day7: f64,
}

impl ScopeMetrics {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Spend => self.spend,
            Metric::Installs => self.installs,
            Metric::Registrations => self.registrations,
            Metric::RegistrationRate => self.registration_rate,
            Metric::CostPerInstall => self.cost_per_install,
            Metric::CostPerAction => self.cost_per_action,
            Metric::LtvDay1 => self.ltv_day1,
            Metric::LtvDay3 => self.ltv_day3,
            Metric::LtvDay7 => self.ltv_day7,
            Metric::RoiDay1 => self.roi_day1,
            Metric::RoiDay3 => self.roi_day3,
            Metric::RoiDay7 => self.roi_day7,
        }
    }

    pub(crate) fn set(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::Spend => &mut self.spend,
            Metric::Installs => &mut self.installs,
            Metric::Registrations => &mut self.registrations,
            Metric::RegistrationRate => &mut self.registration_rate,
            Metric::CostPerInstall => &mut self.cost_per_install,
            Metric::CostPerAction => &mut self.cost_per_action,
            Metric::LtvDay1 => &mut self.ltv_day1,
            Metric::LtvDay3 => &mut self.ltv_day3,
            Metric::LtvDay7 => &mut self.ltv_day7,
            Metric::RoiDay1 => &mut self.roi_day1,
            Metric::RoiDay3 => &mut self.roi_day3,
            Metric::RoiDay7 => &mut self.roi_day7,
        };
        *slot = value;
    }
}

/// One calendar day of performance data.
///
/// `date` is kept as the source text (`YYYY-MM-DD`); it is only used for
/// ordering and display. `weekday` is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyRecord {
    pub date: String,
    pub weekday: String,
    pub overall: ScopeMetrics,
    pub channel_a: ScopeMetrics,
    pub channel_b: ScopeMetrics,
}

impl DailyRecord {
    pub fn scope(&self, scope: Scope) -> &ScopeMetrics {
        match scope {
            Scope::Overall => &self.overall,
            Scope::ChannelA => &self.channel_a,
            Scope::ChannelB => &self.channel_b,
        }
    }

    pub(crate) fn scope_mut(&mut self, scope: Scope) -> &mut ScopeMetrics {
        match scope {
            Scope::Overall => &mut self.overall,
            Scope::ChannelA => &mut self.channel_a,
            Scope::ChannelB => &mut self.channel_b,
        }
    }

    pub fn value(&self, scope: Scope, metric: Metric) -> f64 {
        self.scope(scope).get(metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get_hits_same_field() {
        let mut m = ScopeMetrics::default();
        m.set(Metric::RoiDay3, 0.042);
        assert_eq!(m.roi_day3, 0.042);
        assert_eq!(m.get(Metric::RoiDay3), 0.042);
        assert_eq!(m.get(Metric::RoiDay7), 0.0);
    }

    #[test]
    fn test_scope_mut_targets_channel() {
        let mut r = DailyRecord::default();
        r.scope_mut(Scope::ChannelB).set(Metric::Spend, 1900.0);
        assert_eq!(r.channel_b.spend, 1900.0);
        assert_eq!(r.overall.spend, 0.0);
        assert_eq!(r.value(Scope::ChannelB, Metric::Spend), 1900.0);
    }
}
