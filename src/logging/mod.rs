//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console logs on stderr
//! - JSON-formatted file logs with rotation
//! - Configurable log levels, overridable with `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use pt2onnx::logging::init_logging;
//! use pt2onnx::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(checkpoint = "weights/car_detect.pt", "Exporting");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a job
///
/// # Example
///
/// ```no_run
/// use pt2onnx::log_job_start;
/// use pt2onnx::domain::{ExportFormat, ExportJob, ImageSize};
///
/// let job = ExportJob::new("car_detect.pt", ExportFormat::Onnx, true, ImageSize::new(1024, 1280)).unwrap();
/// log_job_start!(0, &job);
/// ```
#[macro_export]
macro_rules! log_job_start {
    ($index:expr, $job:expr) => {
        tracing::info!(
            job = $index,
            checkpoint = %$job.source_checkpoint_path().display(),
            format = %$job.output_format(),
            imgsz = %$job.image_size(),
            simplify = $job.simplify(),
            "Starting export job"
        );
    };
}

/// Log the outcome of a job
///
/// # Example
///
/// ```no_run
/// use pt2onnx::log_job_complete;
/// use pt2onnx::domain::{ExportFormat, ExportJob, ExportResult, ImageSize};
///
/// let job = ExportJob::new("car_detect.pt", ExportFormat::Onnx, true, ImageSize::new(1024, 1280)).unwrap();
/// let result = ExportResult::success(job, "car_detect.onnx".into());
/// log_job_complete!(0, &result);
/// ```
#[macro_export]
macro_rules! log_job_complete {
    ($index:expr, $result:expr) => {
        match &$result.error {
            Some(error) => tracing::error!(
                job = $index,
                checkpoint = %$result.job.source_checkpoint_path().display(),
                error_kind = ?error.kind(),
                error = %error,
                duration_ms = $result.duration.as_millis() as u64,
                "Export job failed"
            ),
            None => tracing::info!(
                job = $index,
                status = ?$result.status,
                output = ?$result.output_path,
                duration_ms = $result.duration.as_millis() as u64,
                "Export job finished"
            ),
        }
    };
}
