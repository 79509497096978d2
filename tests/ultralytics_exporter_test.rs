//! Integration tests for the Ultralytics exporter backend
//!
//! The `yolo` program is replaced by small shell scripts so the tests run
//! without Python.

#![cfg(unix)]

mod common;

use common::{onnx_job, write_checkpoint};
use pt2onnx::adapters::exporter::{create_exporter, ModelExporter};
use pt2onnx::config::ExporterConfig;
use pt2onnx::core::checkpoint::Checkpoint;
use pt2onnx::core::export::{DriverSettings, ExportDriver};
use pt2onnx::domain::{ExportStatus, JobError};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

/// Writes `<stem>.onnx` next to the model and records its arguments
const FAKE_YOLO: &str = r#"
for arg in "$@"; do
  case "$arg" in
    model=*) model="${arg#model=}" ;;
  esac
done
stem="${model%.pt}"
echo "$@" > "$stem.args"
echo "device=$FAKE_DEVICE_ENV" >> "$stem.args"
printf 'onnx-graph' > "$stem.onnx"
echo "Export complete"
"#;

const FAILING_YOLO: &str = r#"
echo "Ultralytics YOLOv8 starting"
echo "Traceback (most recent call last):" >&2
echo "RuntimeError: unsupported operator" >&2
exit 3
"#;

const SLOW_YOLO: &str = "sleep 5\n";

/// Leaves a background job that writes `$MARKER` unless it is killed
const FORKING_YOLO: &str = r#"
(sleep 2; touch "$MARKER") &
wait
"#;

/// Exporter config that runs `script` through `sh`
fn script_config(dir: &Path, script: &str) -> ExporterConfig {
    let path = dir.join("yolo.sh");
    std::fs::write(&path, script).unwrap();

    ExporterConfig {
        program: "sh".to_string(),
        args: vec![path.to_string_lossy().to_string(), "export".to_string()],
        ..ExporterConfig::default()
    }
}

async fn export_one(
    exporter: Arc<dyn ModelExporter>,
    checkpoint: &Path,
) -> Result<std::path::PathBuf, JobError> {
    let loaded = Checkpoint::load(checkpoint).await.unwrap();
    exporter.export(&loaded, &onnx_job(checkpoint)).await
}

#[tokio::test]
async fn test_successful_export_passes_job_arguments() {
    let temp_dir = TempDir::new().unwrap();
    let checkpoint = write_checkpoint(temp_dir.path(), "car_detect.pt");

    let mut env = BTreeMap::new();
    env.insert("FAKE_DEVICE_ENV".to_string(), "from-config".to_string());
    let config = ExporterConfig {
        device: Some("cpu".to_string()),
        env,
        ..script_config(temp_dir.path(), FAKE_YOLO)
    };

    let exporter = create_exporter(&config).unwrap();
    let artifact = export_one(exporter, &checkpoint).await.unwrap();

    assert_eq!(artifact, temp_dir.path().join("car_detect.onnx"));
    assert_eq!(std::fs::read(&artifact).unwrap(), b"onnx-graph");

    let args = std::fs::read_to_string(temp_dir.path().join("car_detect.args")).unwrap();
    assert!(args.starts_with("export model="));
    assert!(args.contains("format=onnx"));
    assert!(args.contains("imgsz=1024,1280"));
    assert!(args.contains("simplify=True"));
    assert!(args.contains("device=cpu"));
    assert!(args.contains("device=from-config"));
}

#[tokio::test]
async fn test_non_zero_exit_is_export_error() {
    let temp_dir = TempDir::new().unwrap();
    let checkpoint = write_checkpoint(temp_dir.path(), "car_detect.pt");

    let exporter = create_exporter(&script_config(temp_dir.path(), FAILING_YOLO)).unwrap();
    let error = export_one(exporter, &checkpoint).await.unwrap_err();

    match error {
        JobError::Export(message) => {
            assert!(message.starts_with("exporter exited with"));
            assert!(message.ends_with("RuntimeError: unsupported operator"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_program_is_export_error() {
    let temp_dir = TempDir::new().unwrap();
    let checkpoint = write_checkpoint(temp_dir.path(), "car_detect.pt");

    let config = ExporterConfig {
        program: temp_dir
            .path()
            .join("no-such-yolo")
            .to_string_lossy()
            .to_string(),
        ..ExporterConfig::default()
    };
    let exporter = create_exporter(&config).unwrap();
    let error = export_one(exporter, &checkpoint).await.unwrap_err();

    assert!(matches!(error, JobError::Export(msg) if msg.starts_with("failed to launch exporter")));
}

#[tokio::test]
async fn test_timeout_is_export_error() {
    let temp_dir = TempDir::new().unwrap();
    let checkpoint = write_checkpoint(temp_dir.path(), "car_detect.pt");

    let config = ExporterConfig {
        timeout_secs: 1,
        ..script_config(temp_dir.path(), SLOW_YOLO)
    };
    let exporter = create_exporter(&config).unwrap();
    let error = export_one(exporter, &checkpoint).await.unwrap_err();

    assert_eq!(
        error,
        JobError::Export("exporter timed out after 1s".to_string())
    );
}

#[tokio::test]
async fn test_driver_with_script_exporter() {
    let temp_dir = TempDir::new().unwrap();
    let detect = write_checkpoint(temp_dir.path(), "weights/car_detect.pt");
    let classify = write_checkpoint(temp_dir.path(), "weights/car_classification.pt");

    let exporter = create_exporter(&script_config(temp_dir.path(), FAKE_YOLO)).unwrap();
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let driver = ExportDriver::new(exporter, DriverSettings::default(), shutdown_rx);

    let summary = driver
        .run(&[onnx_job(&detect), onnx_job(&classify)])
        .await;

    assert_eq!(summary.successful(), 2);
    assert_eq!(summary.results[0].status, ExportStatus::Success);
    assert!(temp_dir.path().join("weights/car_detect.onnx").exists());
    assert!(temp_dir.path().join("weights/car_classification.onnx").exists());
}

#[tokio::test]
async fn test_timeout_kills_exporter_children() {
    let temp_dir = TempDir::new().unwrap();
    let checkpoint = write_checkpoint(temp_dir.path(), "car_detect.pt");
    let marker = temp_dir.path().join("still-running");

    let mut env = BTreeMap::new();
    env.insert(
        "MARKER".to_string(),
        marker.to_string_lossy().to_string(),
    );
    let config = ExporterConfig {
        timeout_secs: 1,
        env,
        ..script_config(temp_dir.path(), FORKING_YOLO)
    };
    let exporter = create_exporter(&config).unwrap();
    let error = export_one(exporter, &checkpoint).await.unwrap_err();
    assert!(matches!(error, JobError::Export(msg) if msg.contains("timed out")));

    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    assert!(!marker.exists());
}
