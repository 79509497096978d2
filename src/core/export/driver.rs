//! Batch export driver - runs export jobs one at a time
//!
//! The driver walks the job list in order and produces exactly one
//! [`ExportResult`] per job. A failing job never stops the batch.

use crate::adapters::exporter::ModelExporter;
use crate::config::{ExistingArtifactPolicy, ExportConfig};
use crate::core::checkpoint::Checkpoint;
use crate::core::checksum::calculate_file_checksum;
use crate::core::export::summary::ExportSummary;
use crate::domain::{ExportFormat, ExportJob, ExportResult, JobError};
use crate::{log_job_complete, log_job_start};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Driver behaviour shared by all jobs of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverSettings {
    /// Policy for artifacts that already exist
    pub if_exists: ExistingArtifactPolicy,

    /// Verify checkpoints and plan artifacts without invoking the exporter
    pub dry_run: bool,
}

impl DriverSettings {
    /// Build settings from the `[export]` section
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            if_exists: config.if_exists,
            dry_run: config.dry_run,
        }
    }
}

/// Batch export driver
pub struct ExportDriver {
    exporter: Arc<dyn ModelExporter>,
    settings: DriverSettings,
    shutdown_signal: watch::Receiver<bool>,
}

impl ExportDriver {
    /// Create a new driver
    ///
    /// `shutdown_signal` is checked before each job; once it reads `true`
    /// the remaining jobs are reported as interrupted.
    pub fn new(
        exporter: Arc<dyn ModelExporter>,
        settings: DriverSettings,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Self {
        Self {
            exporter,
            settings,
            shutdown_signal,
        }
    }

    /// Run every job in order
    ///
    /// The returned summary holds one result per job, in job order. Per-job
    /// failures are recorded in the results and never returned as errors.
    pub async fn run(&self, jobs: &[ExportJob]) -> ExportSummary {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new(self.settings.dry_run);

        tracing::info!(
            run_id = %summary.run_id,
            job_count = jobs.len(),
            exporter = self.exporter.name(),
            if_exists = %self.settings.if_exists,
            dry_run = self.settings.dry_run,
            "Starting export run"
        );

        for (index, job) in jobs.iter().enumerate() {
            if !summary.interrupted && *self.shutdown_signal.borrow() {
                tracing::warn!(
                    remaining = jobs.len() - index,
                    "Shutdown requested, skipping remaining jobs"
                );
                summary.interrupted = true;
            }

            let result = if summary.interrupted {
                ExportResult::failure(job.clone(), JobError::Interrupted)
            } else {
                log_job_start!(index, job);
                let job_start = Instant::now();
                self.run_job(job).await.with_duration(job_start.elapsed())
            };

            log_job_complete!(index, result);
            summary.add_result(result);
        }

        summary.with_duration(start_time.elapsed())
    }

    async fn run_job(&self, job: &ExportJob) -> ExportResult {
        let format = job.output_format();
        if !self.exporter.supports(format) {
            return ExportResult::failure(
                job.clone(),
                JobError::Configuration(format!(
                    "exporter '{}' does not support format '{format}'",
                    self.exporter.name()
                )),
            );
        }

        let checkpoint = match Checkpoint::load(job.source_checkpoint_path()).await {
            Ok(checkpoint) => checkpoint,
            Err(e) => return ExportResult::failure(job.clone(), e),
        };
        let checkpoint_checksum = checkpoint.checksum().to_string();

        let planned_path = job.artifact_path();
        if artifact_exists(&planned_path).await {
            match self.settings.if_exists {
                ExistingArtifactPolicy::Overwrite if self.settings.dry_run => {}
                ExistingArtifactPolicy::Overwrite => {
                    tracing::debug!(
                        artifact = %planned_path.display(),
                        "Removing existing artifact before export"
                    );
                    // A stale artifact must not pass the post-export check
                    if let Err(e) = remove_artifact(&planned_path, format).await {
                        return ExportResult::failure(
                            job.clone(),
                            JobError::Export(format!(
                                "failed to remove existing artifact {}: {e}",
                                planned_path.display()
                            )),
                        )
                        .with_checkpoint_checksum(checkpoint_checksum);
                    }
                }
                ExistingArtifactPolicy::Skip => {
                    let artifact_checksum = artifact_checksum(&planned_path).await;
                    return ExportResult::skipped(job.clone(), planned_path)
                        .with_checkpoint_checksum(checkpoint_checksum)
                        .with_artifact_checksum(artifact_checksum);
                }
                ExistingArtifactPolicy::Error => {
                    return ExportResult::failure(
                        job.clone(),
                        JobError::Export(format!(
                            "artifact already exists: {}",
                            planned_path.display()
                        )),
                    )
                    .with_checkpoint_checksum(checkpoint_checksum);
                }
            }
        }

        if self.settings.dry_run {
            tracing::info!(
                checkpoint = %job.source_checkpoint_path().display(),
                artifact = %planned_path.display(),
                "Dry run: exporter not invoked"
            );
            return ExportResult::skipped(job.clone(), planned_path)
                .with_checkpoint_checksum(checkpoint_checksum);
        }

        let output_path = match self.exporter.export(&checkpoint, job).await {
            Ok(path) => path,
            Err(e) => {
                return ExportResult::failure(job.clone(), e)
                    .with_checkpoint_checksum(checkpoint_checksum)
            }
        };

        if !artifact_exists(&output_path).await {
            return ExportResult::failure(
                job.clone(),
                JobError::Export(format!(
                    "exporter reported success but artifact is missing: {}",
                    output_path.display()
                )),
            )
            .with_checkpoint_checksum(checkpoint_checksum);
        }

        let artifact_checksum = artifact_checksum(&output_path).await;
        ExportResult::success(job.clone(), output_path)
            .with_checkpoint_checksum(checkpoint_checksum)
            .with_artifact_checksum(artifact_checksum)
    }
}

async fn artifact_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

async fn remove_artifact(path: &Path, format: ExportFormat) -> std::io::Result<()> {
    if format.is_directory_artifact() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    }
}

/// Checksum of a single-file artifact; directory artifacts have none
async fn artifact_checksum(path: &Path) -> Option<String> {
    let metadata = tokio::fs::metadata(path).await.ok()?;
    if !metadata.is_file() {
        return None;
    }

    match calculate_file_checksum(path).await {
        Ok(checksum) => Some(checksum),
        Err(e) => {
            tracing::warn!(
                artifact = %path.display(),
                error = %e,
                "Failed to checksum artifact"
            );
            None
        }
    }
}
