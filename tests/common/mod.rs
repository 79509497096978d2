//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use pt2onnx::adapters::exporter::ModelExporter;
use pt2onnx::core::checkpoint::Checkpoint;
use pt2onnx::core::export::{DriverSettings, ExportDriver};
use pt2onnx::domain::{ExportFormat, ExportJob, ImageSize, JobError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Zip-archive header used by `torch.save`
pub const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Write a checkpoint that passes format detection
pub fn write_checkpoint(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut contents = ZIP_MAGIC.to_vec();
    contents.extend_from_slice(name.as_bytes());
    std::fs::write(&path, contents).unwrap();
    path
}

/// ONNX job with the car-model settings
pub fn onnx_job(path: impl Into<PathBuf>) -> ExportJob {
    ExportJob::new(path, ExportFormat::Onnx, true, ImageSize::new(1024, 1280)).unwrap()
}

/// In-process exporter that writes a deterministic artifact
#[derive(Default)]
pub struct FakeExporter {
    /// Fail jobs whose checkpoint file name contains this text
    pub fail_on: Option<String>,
    /// Report success without writing anything
    pub skip_write: bool,
    /// Formats this exporter refuses
    pub unsupported: Vec<ExportFormat>,
    /// Signal shutdown while handling the first job
    pub shutdown_on_first: Mutex<Option<watch::Sender<bool>>>,
    /// Number of `export` calls so far
    pub calls: AtomicUsize,
}

impl FakeExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_on: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelExporter for FakeExporter {
    fn name(&self) -> &str {
        "fake"
    }

    fn supports(&self, format: ExportFormat) -> bool {
        !self.unsupported.contains(&format)
    }

    async fn export(&self, checkpoint: &Checkpoint, job: &ExportJob) -> Result<PathBuf, JobError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(sender) = self.shutdown_on_first.lock().unwrap().take() {
            sender.send(true).unwrap();
        }

        let file_name = checkpoint
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if let Some(pattern) = &self.fail_on {
            if file_name.contains(pattern.as_str()) {
                return Err(JobError::Export(format!(
                    "exporter exited with exit status: 1: cannot export {file_name}"
                )));
            }
        }

        let artifact = job.output_format().artifact_path(checkpoint.path());
        if !self.skip_write {
            let graph = format!(
                "graph checksum={} imgsz={} simplify={}",
                checkpoint.checksum(),
                job.image_size(),
                job.simplify()
            );
            tokio::fs::write(&artifact, graph)
                .await
                .map_err(|e| JobError::Export(e.to_string()))?;
        }
        Ok(artifact)
    }
}

/// Driver over a fake exporter with no shutdown requested
pub fn driver(exporter: Arc<FakeExporter>, settings: DriverSettings) -> ExportDriver {
    let (_tx, rx) = watch::channel(false);
    ExportDriver::new(exporter, settings, rx)
}
