//! Integration tests for graceful shutdown
//!
//! These tests verify that:
//! - A shutdown signal stops new jobs from starting
//! - The job in progress is allowed to finish
//! - Every job still gets a result

mod common;

use common::{onnx_job, write_checkpoint, FakeExporter};
use pt2onnx::core::export::{DriverSettings, ExportDriver};
use pt2onnx::domain::{ErrorKind, ExportStatus, JobError};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::watch;

#[tokio::test]
async fn test_shutdown_signal_channel() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let other_rx = shutdown_rx.clone();

    assert!(!*shutdown_rx.borrow());

    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx.borrow());
    assert!(*other_rx.borrow());
}

#[tokio::test]
async fn test_shutdown_before_run_interrupts_every_job() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_checkpoint(temp_dir.path(), "a.pt");
    let b = write_checkpoint(temp_dir.path(), "b.pt");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    shutdown_tx.send(true).unwrap();

    let exporter = Arc::new(FakeExporter::new());
    let driver = ExportDriver::new(exporter.clone(), DriverSettings::default(), shutdown_rx);
    let summary = driver.run(&[onnx_job(&a), onnx_job(&b)]).await;

    assert!(summary.interrupted);
    assert_eq!(summary.total(), 2);
    assert_eq!(summary.failed(), 2);
    assert_eq!(exporter.calls(), 0);
    for result in &summary.results {
        assert_eq!(result.error, Some(JobError::Interrupted));
        assert_eq!(result.error.as_ref().map(JobError::kind), Some(ErrorKind::Export));
        assert!(result.checkpoint_checksum.is_none());
    }
    assert!(!temp_dir.path().join("a.onnx").exists());
}

#[tokio::test]
async fn test_shutdown_during_job_finishes_current_job() {
    let temp_dir = TempDir::new().unwrap();
    let jobs = ["a.pt", "b.pt", "c.pt"]
        .iter()
        .map(|name| onnx_job(write_checkpoint(temp_dir.path(), name)))
        .collect::<Vec<_>>();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let exporter = Arc::new(FakeExporter {
        shutdown_on_first: Mutex::new(Some(shutdown_tx)),
        ..FakeExporter::default()
    });
    let driver = ExportDriver::new(exporter.clone(), DriverSettings::default(), shutdown_rx);
    let summary = driver.run(&jobs).await;

    assert!(summary.interrupted);
    assert_eq!(exporter.calls(), 1);
    assert_eq!(summary.results.len(), 3);

    assert_eq!(summary.results[0].status, ExportStatus::Success);
    assert!(temp_dir.path().join("a.onnx").exists());
    assert_eq!(summary.results[1].error, Some(JobError::Interrupted));
    assert_eq!(summary.results[2].error, Some(JobError::Interrupted));
}
