//! Diagnostic report generation.
//!
//! A [`ReportRequest`] is a read-only digest of a snapshot: the overall
//! rollup plus the most recent days. A [`ReportGenerator`] turns it into
//! free-form Markdown. The text is displayed as-is and never parsed back into
//! the data model.

mod gemini;

pub use gemini::GeminiClient;

use anyhow::Result;
use serde::Serialize;

use crate::config::ReportConfig;
use crate::format;
use crate::record::DailyRecord;
use crate::series::Series;
use crate::stats::SummaryRollup;

/// Produces a prose report for a snapshot.
#[async_trait::async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Returns the report text, or an error if the backend failed or
    /// returned nothing.
    async fn generate(&self, request: &ReportRequest) -> Result<String>;
}

/// One recent day as sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentDay {
    pub date: String,
    pub total_spend: f64,
    pub total_roi_day1: f64,
    pub channel_a_cpa: f64,
    pub channel_b_cpa: f64,
    pub channel_b_roi_day1: f64,
}

impl From<&DailyRecord> for RecentDay {
    fn from(r: &DailyRecord) -> Self {
        Self {
            date: r.date.clone(),
            total_spend: r.overall.spend,
            total_roi_day1: r.overall.roi_day1,
            channel_a_cpa: r.channel_a.cost_per_action,
            channel_b_cpa: r.channel_b.cost_per_action,
            channel_b_roi_day1: r.channel_b.roi_day1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRequest {
    pub summary: SummaryRollup,
    pub recent: Vec<RecentDay>,
    pub channel_a_label: String,
    pub channel_b_label: String,
}

impl ReportRequest {
    pub fn new(series: &Series, summary: &SummaryRollup, config: &ReportConfig) -> Self {
        Self {
            summary: summary.clone(),
            recent: series.recent(config.recent_days).iter().map(RecentDay::from).collect(),
            channel_a_label: config.channel_a_label.clone(),
            channel_b_label: config.channel_b_label.clone(),
        }
    }

    /// Renders the model prompt.
    pub fn prompt(&self) -> Result<String> {
        let recent = serde_json::to_string(&self.recent)?;
        let (a, b) = (&self.channel_a_label, &self.channel_b_label);

        Ok(format!(
            "You are a senior user-acquisition analyst for games and apps. Using the overview \
and the most recent {days} days of data below, write a short, focused campaign diagnostic report.

Overview:
- Total spend: {spend}
- Total installs: {installs}
- Registration rate: {reg_rate}
- Average day-1 ROI: {roi}

Recent daily data (JSON; channel_a = {a}, channel_b = {b}):
{recent}

Answer in Markdown with three sections:
1. **Trend diagnosis**: describe recent movement in spend, CPA and ROI (rising, falling or flat) and call out any unusual swings.
2. **Channel comparison**: compare {a} and {b} on CPA and ROI and say which channel delivers better quality.
3. **Recommendations**: give 3 concrete adjustments (budget split, bid direction and similar).

Keep the tone professional, objective and action-oriented. Prefer plain language over jargon.",
            days = self.recent.len(),
            spend = format::currency(self.summary.total_spend),
            installs = format::number(self.summary.total_installs),
            reg_rate = format::percent(self.summary.avg_registration_rate),
            roi = format::percent(self.summary.avg_roi_day1),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::ingest;

    fn sample() -> (Series, SummaryRollup) {
        let mut raw = String::from("日期,星期\n");
        for day in (1..=9).rev() {
            raw.push_str(&format!(
                "2025-06-{:02},x,100,10,12,1.2,10,8.33,0.4,0.5,0.6,0.04,0.05,0.06,\
30,6,7,1.1,4.2,0,0,0,0.05,0,0,70,4,5,1.25,14,0,0,0,0.03,0,0\n",
                day
            ));
        }
        ingest(&raw)
    }

    #[test]
    fn test_request_takes_recent_days() {
        let (series, summary) = sample();
        let request = ReportRequest::new(&series, &summary, &ReportConfig::default());

        assert_eq!(request.recent.len(), 7);
        assert_eq!(request.recent[0].date, "2025-06-03");
        assert_eq!(request.recent[6].date, "2025-06-09");
        assert_eq!(request.recent[0].channel_a_cpa, 4.2);
        assert_eq!(request.recent[0].channel_b_cpa, 14.0);
        assert_eq!(request.recent[0].channel_b_roi_day1, 0.03);
    }

    #[test]
    fn test_prompt_contains_overview_and_rows() {
        let (series, summary) = sample();
        let request = ReportRequest::new(&series, &summary, &ReportConfig::default());
        let prompt = request.prompt().unwrap();

        assert!(prompt.contains("Total spend: $900.00"));
        assert!(prompt.contains("Total installs: 90"));
        assert!(prompt.contains("Registration rate: 120.00%"));
        assert!(prompt.contains("\"date\":\"2025-06-09\""));
        assert!(prompt.contains("compare Android and iOS"));
    }

    #[test]
    fn test_short_series_sends_everything() {
        let (series, summary) = ingest("2025-06-16,Mon,1\n");
        let request = ReportRequest::new(&series, &summary, &ReportConfig::default());

        assert_eq!(request.recent.len(), 1);
    }
}
