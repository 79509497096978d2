//! Export command implementation
//!
//! This module implements the `export` command, which runs every configured
//! (or command-line) job through the batch export driver.

use crate::adapters::exporter::create_exporter;
use crate::cli::DEFAULT_CONFIG_PATH;
use crate::config::{
    default_config, load_config, ExistingArtifactPolicy, JobConfig, Pt2OnnxConfig,
};
use crate::core::export::{DriverSettings, ExportDriver, ExportSummary};
use crate::domain::{ExportFormat, ExportStatus, ImageSize};
use clap::Args;
use std::path::Path;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Checkpoints to export; replaces the configured job list
    #[arg(value_name = "CHECKPOINT")]
    pub checkpoints: Vec<String>,

    /// Override the target format for every job
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ExportFormat>,

    /// Override the input size for every job (e.g. 1024,1280 or 640)
    #[arg(long, value_name = "HxW")]
    pub imgsz: Option<ImageSize>,

    /// Disable graph simplification for every job
    #[arg(long)]
    pub no_simplify: bool,

    /// What to do with artifacts that already exist (overwrite, skip, error)
    #[arg(long, value_name = "POLICY")]
    pub if_exists: Option<ExistingArtifactPolicy>,

    /// Dry run mode - verify checkpoints and plan artifacts without exporting
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON run report to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match self.load(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        self.apply_overrides(&mut config);

        // Validate configuration
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let jobs = match config.build_jobs() {
            Ok(jobs) if jobs.is_empty() => {
                eprintln!(
                    "No export jobs: add [[jobs]] entries to {config_path} or pass checkpoint paths"
                );
                return Ok(2);
            }
            Ok(jobs) => jobs,
            Err(e) => {
                eprintln!("Configuration validation failed: {e}");
                return Ok(2);
            }
        };

        let exporter = match create_exporter(&config.exporter) {
            Ok(exporter) => exporter,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create exporter");
                eprintln!("Failed to initialize exporter: {e}");
                return Ok(2);
            }
        };

        if config.export.dry_run {
            tracing::info!("Dry run mode enabled - exporter will not be invoked");
            println!("🔍 DRY RUN MODE - No artifacts will be written");
            println!();
        }

        println!("🚀 Starting export of {} job(s)...", jobs.len());
        println!();

        let driver = ExportDriver::new(
            exporter,
            DriverSettings::from_config(&config.export),
            shutdown_signal,
        );
        let summary = driver.run(&jobs).await;
        summary.log_summary();

        print_summary(&summary);

        if let Some(report_path) = &config.export.report_path {
            match summary.write_report(Path::new(report_path)).await {
                Ok(()) => println!("📝 Report written to {report_path}"),
                Err(e) => {
                    tracing::error!(error = %e, path = %report_path, "Failed to write report");
                    eprintln!("Failed to write report: {e}");
                    return Ok(5); // Fatal error exit code
                }
            }
        }

        Ok(exit_code(&summary))
    }

    /// Load the configuration file, or the built-in defaults when the default
    /// config file is absent and checkpoints were given on the command line
    fn load(&self, config_path: &str) -> crate::domain::Result<Pt2OnnxConfig> {
        if !self.checkpoints.is_empty()
            && config_path == DEFAULT_CONFIG_PATH
            && !Path::new(config_path).exists()
        {
            tracing::info!(
                config_path = %config_path,
                "Configuration file not found, using built-in defaults"
            );
            return default_config();
        }
        load_config(config_path)
    }

    /// Apply command-line overrides
    ///
    /// A per-job setting given on the command line replaces both the default
    /// and any per-job value from the file.
    pub fn apply_overrides(&self, config: &mut Pt2OnnxConfig) {
        if !self.checkpoints.is_empty() {
            tracing::info!(checkpoints = ?self.checkpoints, "Using checkpoints from CLI");
            config.jobs = self
                .checkpoints
                .iter()
                .map(JobConfig::from_checkpoint)
                .collect();
        }

        if let Some(format) = self.format {
            tracing::info!(format = %format, "Overriding export format from CLI");
            config.defaults.format = format;
            config.jobs.iter_mut().for_each(|job| job.format = None);

            // The default simplify=true would make every job invalid
            if !format.supports_simplify() {
                config.defaults.simplify = false;
                config.jobs.iter_mut().for_each(|job| job.simplify = None);
            }
        }

        if let Some(image_size) = self.imgsz {
            tracing::info!(imgsz = %image_size, "Overriding image size from CLI");
            config.defaults.image_size = image_size;
            config.jobs.iter_mut().for_each(|job| job.image_size = None);
        }

        if self.no_simplify {
            tracing::info!("Disabling simplify from CLI");
            config.defaults.simplify = false;
            config.jobs.iter_mut().for_each(|job| job.simplify = None);
        }

        if let Some(policy) = self.if_exists {
            tracing::info!(if_exists = %policy, "Overriding existing-artifact policy from CLI");
            config.export.if_exists = policy;
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.export.dry_run = true;
        }

        if let Some(report) = &self.report {
            config.export.report_path = Some(report.clone());
        }
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    for result in &summary.results {
        let checkpoint = result.job.source_checkpoint_path().display();
        match (result.status, result.output_path(), result.error_message()) {
            (ExportStatus::Failure, _, Some(error)) => {
                println!("  ❌ {checkpoint}: {error}");
            }
            (ExportStatus::Skipped, Some(path), _) => {
                println!("  ⏭️  {checkpoint} -> {} (skipped)", path.display());
            }
            (_, Some(path), _) => println!("  ✅ {checkpoint} -> {}", path.display()),
            (status, None, _) => println!("  {checkpoint}: {status:?}"),
        }
    }
    println!();
    println!("  Total Jobs: {}", summary.total());
    println!("  Successful: {}", summary.successful());
    println!("  Failed: {}", summary.failed());
    println!("  Skipped: {}", summary.skipped());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", summary.success_rate());
    println!();
}

/// Map a finished run to the process exit code
pub fn exit_code(summary: &ExportSummary) -> i32 {
    if summary.interrupted {
        println!("⚠️  Export interrupted. Remaining jobs were not started.");
        tracing::info!("Export interrupted by user signal");
        130 // SIGINT exit code (standard Unix convention)
    } else if summary.is_successful() {
        println!("✅ Export completed successfully!");
        0
    } else {
        println!("⚠️  Export completed with failures");
        1
    }
}
