//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the pt2onnx configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also validates, including every job
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let jobs = match config.build_jobs() {
            Ok(jobs) => jobs,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Exporter Backend: {}", config.exporter.backend);
        println!(
            "  Exporter Command: {} {}",
            config.exporter.program,
            config.exporter.args.join(" ")
        );
        println!(
            "  Device: {}",
            config.exporter.device.as_deref().unwrap_or("(exporter default)")
        );
        println!("  Timeout: {}s", config.exporter.timeout_secs);
        println!("  If Exists: {}", config.export.if_exists);
        println!("  Dry Run: {}", config.export.dry_run);
        if let Some(report_path) = &config.export.report_path {
            println!("  Report Path: {report_path}");
        }
        println!("  Jobs: {}", jobs.len());
        for job in &jobs {
            println!("    - {job}");
        }
        if jobs.is_empty() {
            println!("⚠️  No jobs configured; pass checkpoint paths to `pt2onnx export`");
        }
        println!();

        Ok(0)
    }
}
