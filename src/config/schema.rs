//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::domain::{ExportFormat, ExportJob, ExportJobBuilder, ImageSize, JobError, Pt2OnnxError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// What to do when a job's artifact already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExistingArtifactPolicy {
    /// Export again and replace the artifact
    #[default]
    Overwrite,
    /// Keep the artifact and report the job as skipped
    Skip,
    /// Fail the job
    Error,
}

impl fmt::Display for ExistingArtifactPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExistingArtifactPolicy::Overwrite => "overwrite",
            ExistingArtifactPolicy::Skip => "skip",
            ExistingArtifactPolicy::Error => "error",
        };
        f.write_str(name)
    }
}

impl FromStr for ExistingArtifactPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overwrite" => Ok(ExistingArtifactPolicy::Overwrite),
            "skip" => Ok(ExistingArtifactPolicy::Skip),
            "error" => Ok(ExistingArtifactPolicy::Error),
            _ => Err(format!(
                "Invalid existing-artifact policy '{s}'. Must be one of: overwrite, skip, error"
            )),
        }
    }
}

/// Main pt2onnx configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Pt2OnnxConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// External exporter settings
    #[serde(default)]
    pub exporter: ExporterConfig,

    /// Batch behaviour
    #[serde(default)]
    pub export: ExportConfig,

    /// Settings applied to every job unless the job overrides them
    #[serde(default)]
    pub defaults: JobDefaults,

    /// Checkpoints to export, in order
    #[serde(default)]
    pub jobs: Vec<JobConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Pt2OnnxConfig {
    /// Validates the configuration
    ///
    /// Job validation is done by building every job, so an invalid image
    /// size or format combination is caught here without touching the
    /// filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.exporter.validate()?;
        self.logging.validate()?;
        self.build_jobs().map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Builds the validated job list in configured order
    ///
    /// # Errors
    ///
    /// Returns [`Pt2OnnxError::Configuration`] naming the first invalid job.
    pub fn build_jobs(&self) -> Result<Vec<ExportJob>, Pt2OnnxError> {
        self.jobs
            .iter()
            .enumerate()
            .map(|(index, job)| {
                job.to_export_job(&self.defaults).map_err(|e| {
                    Pt2OnnxError::Configuration(format!(
                        "jobs[{index}] ({}): {}",
                        job.checkpoint,
                        match e {
                            JobError::Configuration(msg) => msg,
                            other => other.to_string(),
                        }
                    ))
                })
            })
            .collect()
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// External exporter configuration
///
/// Everything the exporter depends on is listed here and passed on every
/// invocation; nothing is taken from the toolkit's own defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Exporter backend (currently only "ultralytics")
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Program to run
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before the per-job arguments
    #[serde(default = "default_program_args")]
    pub args: Vec<String>,

    /// Maximum time a single export may take, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Compute device passed to the exporter (e.g. "cpu", "0")
    #[serde(default)]
    pub device: Option<String>,

    /// Extra environment variables for the exporter process
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl ExporterConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_backends = ["ultralytics"];
        if !valid_backends.contains(&self.backend.as_str()) {
            return Err(format!(
                "Invalid exporter.backend '{}'. Must be one of: {}",
                self.backend,
                valid_backends.join(", ")
            ));
        }

        if self.program.trim().is_empty() {
            return Err("exporter.program cannot be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("exporter.timeout_secs must be > 0".to_string());
        }

        if let Some(device) = &self.device {
            if device.trim().is_empty() {
                return Err("exporter.device cannot be empty when set".to_string());
            }
        }

        Ok(())
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            program: default_program(),
            args: default_program_args(),
            timeout_secs: default_timeout_secs(),
            device: None,
            env: BTreeMap::new(),
        }
    }
}

/// Batch behaviour
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExportConfig {
    /// Policy for artifacts that already exist
    #[serde(default)]
    pub if_exists: ExistingArtifactPolicy,

    /// Dry run mode - verify checkpoints and plan artifacts without exporting
    #[serde(default)]
    pub dry_run: bool,

    /// Where to write the JSON run report (optional)
    #[serde(default)]
    pub report_path: Option<String>,
}

/// Job settings shared by all jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDefaults {
    /// Target format
    #[serde(default = "default_format")]
    pub format: ExportFormat,

    /// Run the graph simplifier
    #[serde(default = "default_true")]
    pub simplify: bool,

    /// Input resolution, `[height, width]` or a single side
    #[serde(default = "default_image_size")]
    pub image_size: ImageSize,

    /// ONNX opset override
    #[serde(default)]
    pub opset: Option<u32>,

    /// FP16 export
    #[serde(default)]
    pub half: bool,

    /// Dynamic input axes
    #[serde(default)]
    pub dynamic: bool,
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self {
            format: default_format(),
            simplify: true,
            image_size: default_image_size(),
            opset: None,
            half: false,
            dynamic: false,
        }
    }
}

/// One configured job; unset fields fall back to [`JobDefaults`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Checkpoint path
    pub checkpoint: String,

    /// Target format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,

    /// Run the graph simplifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simplify: Option<bool>,

    /// Input resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<ImageSize>,

    /// ONNX opset override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opset: Option<u32>,

    /// FP16 export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half: Option<bool>,

    /// Dynamic input axes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<bool>,
}

impl JobConfig {
    /// Job for a checkpoint that uses the defaults for everything
    pub fn from_checkpoint(checkpoint: impl Into<String>) -> Self {
        Self {
            checkpoint: checkpoint.into(),
            format: None,
            simplify: None,
            image_size: None,
            opset: None,
            half: None,
            dynamic: None,
        }
    }

    /// Resolves defaults and builds the job
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Configuration`] if the resolved settings are invalid.
    pub fn to_export_job(&self, defaults: &JobDefaults) -> Result<ExportJob, JobError> {
        ExportJobBuilder::new(&self.checkpoint)
            .output_format(self.format.unwrap_or(defaults.format))
            .simplify(self.simplify.unwrap_or(defaults.simplify))
            .image_size(self.image_size.unwrap_or(defaults.image_size))
            .opset(self.opset.or(defaults.opset))
            .half(self.half.unwrap_or(defaults.half))
            .dynamic(self.dynamic.unwrap_or(defaults.dynamic))
            .build()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled is true".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_backend() -> String {
    "ultralytics".to_string()
}

fn default_program() -> String {
    "yolo".to_string()
}

fn default_program_args() -> Vec<String> {
    vec!["export".to_string()]
}

fn default_timeout_secs() -> u64 {
    1800
}

fn default_format() -> ExportFormat {
    ExportFormat::Onnx
}

fn default_true() -> bool {
    true
}

fn default_image_size() -> ImageSize {
    ImageSize::new(1024, 1280)
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
