//! Per-job export outcome

use super::errors::JobError;
use super::job::ExportJob;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Final status of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStatus {
    /// Artifact exported
    Success,
    /// Job failed; see [`ExportResult::error`]
    Failure,
    /// Exporter not invoked (dry run, or artifact kept under the skip policy)
    Skipped,
}

/// Outcome of one [`ExportJob`]
///
/// Exactly one result is produced per job.
#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    /// The job this result belongs to
    pub job: ExportJob,

    /// Final status
    pub status: ExportStatus,

    /// Artifact location (written, kept, or planned)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,

    /// Failure details, set only when `status` is `Failure`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JobError>,

    /// SHA-256 of the checkpoint as read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint_checksum: Option<String>,

    /// SHA-256 of the artifact, for single-file artifacts that exist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_checksum: Option<String>,

    /// Wall time spent on the job
    #[serde(serialize_with = "serialize_duration_ms", rename = "duration_ms")]
    pub duration: Duration,
}

impl ExportResult {
    /// Successful export
    pub fn success(job: ExportJob, output_path: PathBuf) -> Self {
        Self::new(job, ExportStatus::Success, Some(output_path), None)
    }

    /// Failed job
    pub fn failure(job: ExportJob, error: JobError) -> Self {
        Self::new(job, ExportStatus::Failure, None, Some(error))
    }

    /// Job that did not invoke the exporter
    pub fn skipped(job: ExportJob, output_path: PathBuf) -> Self {
        Self::new(job, ExportStatus::Skipped, Some(output_path), None)
    }

    fn new(
        job: ExportJob,
        status: ExportStatus,
        output_path: Option<PathBuf>,
        error: Option<JobError>,
    ) -> Self {
        Self {
            job,
            status,
            output_path,
            error,
            checkpoint_checksum: None,
            artifact_checksum: None,
            duration: Duration::ZERO,
        }
    }

    /// Sets the checkpoint checksum
    pub fn with_checkpoint_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checkpoint_checksum = Some(checksum.into());
        self
    }

    /// Sets the artifact checksum
    pub fn with_artifact_checksum(mut self, checksum: Option<String>) -> Self {
        self.artifact_checksum = checksum;
        self
    }

    /// Sets the job duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether the job failed
    pub fn is_failure(&self) -> bool {
        self.status == ExportStatus::Failure
    }

    /// Artifact path as a `Path`
    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    /// Human-readable error message, if the job failed
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

pub(crate) fn serialize_duration_ms<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}
