//! Domain error types
//!
//! Two layers of errors live here:
//!
//! - [`Pt2OnnxError`] is the process-level error for configuration, I/O and
//!   serialization failures. It aborts a command.
//! - [`JobError`] is the per-job error recorded in an export result. It never
//!   aborts the batch.
//!
//! Neither type exposes third-party error types.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Main pt2onnx error type
///
/// This is the primary error type used outside the per-job export path.
#[derive(Debug, Error)]
pub enum Pt2OnnxError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Exporter backend could not be created
    #[error("Exporter error: {0}")]
    Exporter(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Error category of a failed job
///
/// Mirrors the three error classes a job can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The checkpoint is missing, unreadable, or malformed
    CheckpointLoad,
    /// The exporter rejected the configuration or failed internally
    Export,
    /// The job asked for something that cannot work before anything is touched
    Configuration,
}

/// Per-job failure
///
/// Recorded in [`crate::domain::ExportResult::error`]. A `JobError` is
/// isolated to its job; the batch always continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// Checkpoint could not be loaded
    #[error("Checkpoint load error: {0}")]
    CheckpointLoad(String),

    /// The external exporter failed
    #[error("Export error: {0}")]
    Export(String),

    /// Invalid job configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Shutdown was requested before the job started
    #[error("Export error: interrupted before the job started")]
    Interrupted,
}

impl JobError {
    /// Returns the error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            JobError::CheckpointLoad(_) => ErrorKind::CheckpointLoad,
            JobError::Export(_) | JobError::Interrupted => ErrorKind::Export,
            JobError::Configuration(_) => ErrorKind::Configuration,
        }
    }
}

impl Serialize for JobError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("JobError", 2)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl From<std::io::Error> for Pt2OnnxError {
    fn from(err: std::io::Error) -> Self {
        Pt2OnnxError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Pt2OnnxError {
    fn from(err: serde_json::Error) -> Self {
        Pt2OnnxError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Pt2OnnxError {
    fn from(err: toml::de::Error) -> Self {
        Pt2OnnxError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pt2onnx_error_display() {
        let err = Pt2OnnxError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_job_error_kinds() {
        assert_eq!(
            JobError::CheckpointLoad("x".to_string()).kind(),
            ErrorKind::CheckpointLoad
        );
        assert_eq!(JobError::Export("x".to_string()).kind(), ErrorKind::Export);
        assert_eq!(JobError::Interrupted.kind(), ErrorKind::Export);
        assert_eq!(
            JobError::Configuration("x".to_string()).kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_job_error_display() {
        let err = JobError::CheckpointLoad("checkpoint not found: missing.pt".to_string());
        assert_eq!(
            err.to_string(),
            "Checkpoint load error: checkpoint not found: missing.pt"
        );
    }

    #[test]
    fn test_job_error_serializes_kind_and_message() {
        let err = JobError::Export("exporter exited with status 1".to_string());
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["kind"], "export");
        assert_eq!(
            value["message"],
            "Export error: exporter exited with status 1"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: Pt2OnnxError = io_err.into();
        assert!(matches!(err, Pt2OnnxError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: Pt2OnnxError = toml_err.into();
        assert!(matches!(err, Pt2OnnxError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = Pt2OnnxError::Other("Test error".to_string());
        let _: &dyn std::error::Error = &err;
        let job_err = JobError::Interrupted;
        let _: &dyn std::error::Error = &job_err;
    }
}
