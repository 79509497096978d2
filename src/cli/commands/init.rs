//! Init command implementation
//!
//! This module implements the `init` command for generating a starter
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "pt2onnx.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing pt2onnx configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Install the exporter: pip install ultralytics onnx onnxsim");
                println!("  2. Edit the [[jobs]] entries in {}", self.output);
                println!("  3. Validate configuration: pt2onnx validate-config");
                println!("  4. Run export: pt2onnx export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate the starter configuration
    fn generate_config() -> String {
        r#"# pt2onnx Configuration File
# Batch export of model checkpoints to deployable inference graphs

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level: trace | debug | info | warn | error
log_level = "info"

# ============================================================================
# Exporter Configuration
# ============================================================================
[exporter]
# Export backend (currently: ultralytics)
backend = "ultralytics"

# Exporter command and leading arguments
program = "yolo"
args = ["export"]

# Maximum time for a single export, in seconds
timeout_secs = 1800

# Compute device passed to the exporter (e.g. "cpu", "0", "0,1")
# device = "cpu"

# Extra environment variables for the exporter process
# [exporter.env]
# CUDA_VISIBLE_DEVICES = "0"

# ============================================================================
# Export Behaviour
# ============================================================================
[export]
# Existing artifacts: overwrite | skip | error
if_exists = "overwrite"

# Verify checkpoints and plan artifacts without exporting
dry_run = false

# Write a JSON run report
# report_path = "reports/export-report.json"

# ============================================================================
# Job Defaults
# ============================================================================
[defaults]
# Target format: onnx | torchscript | engine | openvino | coreml | ncnn
format = "onnx"

# Run the graph simplifier (onnx and engine only)
simplify = true

# Input size as [height, width], or a single number for square inputs
image_size = [1024, 1280]

# ONNX opset (exporter default when unset)
# opset = 17

half = false
dynamic = false

# ============================================================================
# Jobs (exported in order; any default can be overridden per job)
# ============================================================================
[[jobs]]
checkpoint = "weights/car_detect.pt"

[[jobs]]
checkpoint = "weights/car_classification.pt"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Local log directory
local_path = "logs"

# Log rotation: daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Pt2OnnxConfig;
    use crate::domain::{ExportFormat, ImageSize};
    use tempfile::TempDir;

    #[test]
    fn test_generated_config_parses() {
        let config: Pt2OnnxConfig = toml::from_str(&InitArgs::generate_config()).unwrap();
        config.validate().unwrap();

        let jobs = config.build_jobs().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(
            jobs[0].source_checkpoint_path(),
            Path::new("weights/car_detect.pt")
        );
        assert_eq!(
            jobs[1].source_checkpoint_path(),
            Path::new("weights/car_classification.pt")
        );
        for job in &jobs {
            assert_eq!(job.output_format(), ExportFormat::Onnx);
            assert!(job.simplify());
            assert_eq!(job.image_size(), ImageSize::new(1024, 1280));
        }
    }

    #[tokio::test]
    async fn test_init_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("pt2onnx.toml");
        let args = InitArgs {
            output: output.to_str().unwrap().to_string(),
            force: false,
        };

        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("pt2onnx.toml");
        fs::write(&output, "# existing").unwrap();

        let args = InitArgs {
            output: output.to_str().unwrap().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "# existing");

        let args = InitArgs { force: true, ..args };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output).unwrap().contains("[[jobs]]"));
    }
}
