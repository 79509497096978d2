//! Ultralytics command-line exporter
//!
//! Runs `yolo export model=<checkpoint> format=<fmt> imgsz=<h>,<w> ...` as a
//! child process, one per job. On Unix the child leads its own process group,
//! which is killed as a whole when the export times out.

use crate::adapters::exporter::ModelExporter;
use crate::config::ExporterConfig;
use crate::core::checkpoint::Checkpoint;
use crate::domain::{ExportFormat, ExportJob, JobError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// Exporter backed by the Ultralytics `yolo` CLI
#[derive(Debug, Clone)]
pub struct UltralyticsExporter {
    program: String,
    base_args: Vec<String>,
    device: Option<String>,
    env: BTreeMap<String, String>,
    timeout: Duration,
}

impl UltralyticsExporter {
    /// Create an exporter from configuration
    pub fn new(config: &ExporterConfig) -> Self {
        Self {
            program: config.program.clone(),
            base_args: config.args.clone(),
            device: config.device.clone(),
            env: config.env.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Per-job arguments in the exporter's `key=value` syntax
    pub fn job_args(&self, checkpoint: &Path, job: &ExportJob) -> Vec<String> {
        let mut args = vec![
            format!("model={}", checkpoint.display()),
            format!("format={}", job.output_format()),
            format!("imgsz={}", job.image_size()),
            format!("simplify={}", python_bool(job.simplify())),
        ];

        if let Some(opset) = job.opset() {
            args.push(format!("opset={opset}"));
        }
        if job.half() {
            args.push("half=True".to_string());
        }
        if job.dynamic() {
            args.push("dynamic=True".to_string());
        }
        if let Some(device) = &self.device {
            args.push(format!("device={device}"));
        }

        args
    }

    fn command(&self, checkpoint: &Path, job: &ExportJob) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.base_args)
            .args(self.job_args(checkpoint, job))
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group so a timeout can take down wrapper scripts' children
        #[cfg(unix)]
        command.process_group(0);
        command
    }
}

#[async_trait]
impl ModelExporter for UltralyticsExporter {
    fn name(&self) -> &str {
        "ultralytics"
    }

    fn supports(&self, _format: ExportFormat) -> bool {
        true
    }

    async fn export(&self, checkpoint: &Checkpoint, job: &ExportJob) -> Result<PathBuf, JobError> {
        let child = self
            .command(checkpoint.path(), job)
            .spawn()
            .map_err(|e| {
                JobError::Export(format!("failed to launch exporter '{}': {e}", self.program))
            })?;

        let pid = child.id();
        tracing::debug!(
            program = %self.program,
            pid = ?pid,
            checkpoint = %checkpoint.path().display(),
            "Exporter started"
        );

        // Dropping the future on timeout drops the child, which kills it
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(JobError::Export(format!(
                    "failed to collect exporter output: {e}"
                )))
            }
            Err(_) => {
                if let Some(pid) = pid {
                    kill_process_group(pid).await;
                }
                return Err(JobError::Export(format!(
                    "exporter timed out after {}s",
                    self.timeout.as_secs()
                )))
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::trace!(stdout = %stdout, stderr = %stderr, "Exporter output");

        if !output.status.success() {
            return Err(JobError::Export(failure_message(
                output.status,
                &stderr,
                &stdout,
            )));
        }

        Ok(job.output_format().artifact_path(checkpoint.path()))
    }
}

/// Kill whatever is left of the exporter's process group
#[cfg(unix)]
async fn kill_process_group(pgid: u32) {
    let result = Command::new("kill")
        .arg("-KILL")
        .arg("--")
        .arg(format!("-{pgid}"))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    if let Err(e) = result {
        tracing::warn!(pgid, error = %e, "Failed to kill exporter process group");
    }
}

#[cfg(not(unix))]
async fn kill_process_group(_pgid: u32) {}

fn python_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Last non-empty line of stderr, falling back to stdout
fn failure_message(status: ExitStatus, stderr: &str, stdout: &str) -> String {
    let last_line = |text: &str| {
        text.lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    };

    match last_line(stderr).or_else(|| last_line(stdout)) {
        Some(detail) => format!("exporter exited with {status}: {detail}"),
        None => format!("exporter exited with {status}"),
    }
}
