//! Export summary and reporting
//!
//! This module defines the aggregate result of a batch run and its JSON report.

use crate::domain::outcome::serialize_duration_ms;
use crate::domain::{ExportResult, ExportStatus, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

/// Summary of a batch export run
///
/// `results[i]` is the outcome of the i-th submitted job.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// Unique id of this run
    pub run_id: Uuid,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Wall time of the whole run
    #[serde(serialize_with = "serialize_duration_ms", rename = "duration_ms")]
    pub duration: Duration,

    /// Whether the exporter was bypassed for every job
    pub dry_run: bool,

    /// Whether a shutdown signal cut the run short
    pub interrupted: bool,

    /// Per-job results, in job order
    pub results: Vec<ExportResult>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            duration: Duration::ZERO,
            dry_run,
            interrupted: false,
            results: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Append the next job's result
    pub fn add_result(&mut self, result: ExportResult) {
        self.results.push(result);
    }

    /// Number of jobs
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of jobs that exported an artifact
    pub fn successful(&self) -> usize {
        self.count(ExportStatus::Success)
    }

    /// Number of failed jobs
    pub fn failed(&self) -> usize {
        self.count(ExportStatus::Failure)
    }

    /// Number of jobs that did not invoke the exporter
    pub fn skipped(&self) -> usize {
        self.count(ExportStatus::Skipped)
    }

    fn count(&self, status: ExportStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// Check if the run had no failures
    pub fn is_successful(&self) -> bool {
        self.failed() == 0
    }

    /// Get success rate as a percentage of non-skipped jobs
    pub fn success_rate(&self) -> f64 {
        let attempted = self.total() - self.skipped();
        if attempted == 0 {
            return 100.0;
        }
        (self.successful() as f64 / attempted as f64) * 100.0
    }

    /// Iterate over failed results
    pub fn failures(&self) -> impl Iterator<Item = &ExportResult> {
        self.results.iter().filter(|r| r.is_failure())
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            total = self.total(),
            successful = self.successful(),
            failed = self.failed(),
            skipped = self.skipped(),
            interrupted = self.interrupted,
            dry_run = self.dry_run,
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Export completed"
        );

        if !self.is_successful() {
            tracing::warn!(error_count = self.failed(), "Export completed with errors");
            for result in self.failures() {
                if let Some(error) = &result.error {
                    tracing::warn!(
                        checkpoint = %result.job.source_checkpoint_path().display(),
                        error_kind = ?error.kind(),
                        message = %error,
                        "Export error"
                    );
                }
            }
        }
    }

    /// Write the summary as pretty JSON, creating parent directories
    pub async fn write_report(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;

        tracing::debug!(path = %path.display(), "Wrote export report");
        Ok(())
    }
}
