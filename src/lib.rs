//! Ingestion and rollup of daily advertising-campaign performance exports.
//!
//! [`ingest`] turns the raw text of an export into an ascending [`Series`]
//! of [`DailyRecord`]s plus an overall [`SummaryRollup`]. It never fails:
//! unreadable cells become zero and text without data gives an empty series.

pub mod config;
pub mod fetch;
pub mod format;
pub mod narrative;
pub mod output;
pub mod parser;
pub mod record;
pub mod report;
pub mod schema;
pub mod series;
pub mod session;
pub mod stats;

pub use record::{DailyRecord, ScopeMetrics};
pub use series::{Series, build_series, ingest};
pub use stats::SummaryRollup;
