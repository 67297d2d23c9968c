//! The caller-owned state of a dashboard: the current snapshot and the
//! reports requested against it.
//!
//! Loading a new export replaces the snapshot immediately and never waits on
//! report tasks. A report that was in flight during a load may still finish
//! afterwards; it carries the generation it was requested for, and
//! [`Session::accept`] discards it if that generation is no longer current.
//! Aborting the old task is best-effort only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::ReportConfig;
use crate::report::{ReportGenerator, ReportRequest};
use crate::series::{Series, ingest};
use crate::stats::SummaryRollup;

/// An immutable series/summary pair from one load.
#[derive(Debug)]
pub struct Snapshot {
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
    pub source: Option<String>,
    pub series: Arc<Series>,
    pub summary: SummaryRollup,
}

/// A report being generated for a particular snapshot generation.
pub struct ReportTask {
    pub generation: u64,
    handle: JoinHandle<anyhow::Result<String>>,
}

impl ReportTask {
    /// Waits for the task; a panicked or aborted task becomes an error.
    pub async fn join(self) -> (u64, anyhow::Result<String>) {
        let result = match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(anyhow::anyhow!("report task did not complete: {e}")),
        };
        (self.generation, result)
    }

    /// Requests cancellation. The task may already have finished.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// What to do with a finished report.
#[derive(Debug)]
pub enum ReportOutcome {
    /// Describes the snapshot currently loaded.
    Current(String),
    /// Describes data that has since been replaced; do not display.
    Stale { requested: u64, current: u64 },
    Failed(anyhow::Error),
}

#[derive(Default)]
pub struct Session {
    generation: u64,
    current: Option<Arc<Snapshot>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingests `raw` and makes it the current snapshot.
    pub fn load(&mut self, raw: &str, source: Option<String>) -> Arc<Snapshot> {
        let (series, summary) = ingest(raw);
        self.generation += 1;

        let snapshot = Arc::new(Snapshot {
            generation: self.generation,
            loaded_at: Utc::now(),
            source,
            series: Arc::new(series),
            summary,
        });
        info!(
            generation = snapshot.generation,
            records = snapshot.series.len(),
            "Snapshot loaded"
        );

        self.current = Some(snapshot.clone());
        snapshot
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a report for the current snapshot on the tokio runtime.
    ///
    /// Returns `None` when nothing is loaded or the series is empty.
    pub fn spawn_report<G>(&self, generator: Arc<G>, config: &ReportConfig) -> Option<ReportTask>
    where
        G: ReportGenerator + ?Sized + 'static,
    {
        let snapshot = self.current.as_ref()?;
        if snapshot.series.is_empty() {
            return None;
        }

        let request = ReportRequest::new(&snapshot.series, &snapshot.summary, config);
        let handle = tokio::spawn(async move { generator.generate(&request).await });

        Some(ReportTask {
            generation: snapshot.generation,
            handle,
        })
    }

    /// Classifies a finished report against the current generation.
    pub fn accept(&self, requested: u64, result: anyhow::Result<String>) -> ReportOutcome {
        match result {
            Err(e) => {
                warn!(generation = requested, error = %e, "Report generation failed");
                ReportOutcome::Failed(e)
            }
            Ok(_) if requested != self.generation => {
                warn!(
                    requested,
                    current = self.generation,
                    "Discarding report for replaced data"
                );
                ReportOutcome::Stale {
                    requested,
                    current: self.generation,
                }
            }
            Ok(text) => ReportOutcome::Current(text),
        }
    }
}
