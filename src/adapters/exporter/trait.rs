//! Model exporter trait definition
//!
//! This module defines the `ModelExporter` trait that abstracts the external
//! toolkit which turns a checkpoint into an inference-graph artifact. The
//! export driver only talks to this trait.

use crate::core::checkpoint::Checkpoint;
use crate::domain::{ExportFormat, ExportJob, JobError};
use async_trait::async_trait;
use std::path::PathBuf;

/// Trait for external export backends
///
/// An export call is opaque and atomic from the caller's side: it either
/// produces an artifact or fails with a descriptive error. Implementations
/// must release every resource they acquire (file handles, child processes)
/// before returning, on both paths.
///
/// # Example
///
/// ```no_run
/// use pt2onnx::adapters::exporter::ModelExporter;
/// use pt2onnx::core::checkpoint::Checkpoint;
/// use pt2onnx::domain::ExportJob;
///
/// # async fn example(exporter: &dyn ModelExporter, job: &ExportJob) -> Result<(), Box<dyn std::error::Error>> {
/// let checkpoint = Checkpoint::load(job.source_checkpoint_path()).await?;
/// let artifact = exporter.export(&checkpoint, job).await?;
/// println!("Artifact written to {}", artifact.display());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ModelExporter: Send + Sync {
    /// Short backend name used in logs
    fn name(&self) -> &str;

    /// Whether this backend can produce the given format
    fn supports(&self, format: ExportFormat) -> bool;

    /// Export a loaded checkpoint according to the job settings
    ///
    /// # Returns
    ///
    /// The path of the artifact that was written.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Export`] if the exporter rejects the configuration,
    /// fails, times out, or cannot be started.
    async fn export(&self, checkpoint: &Checkpoint, job: &ExportJob) -> Result<PathBuf, JobError>;
}
