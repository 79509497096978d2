//! Core export logic for pt2onnx.
//!
//! # Modules
//!
//! - [`checkpoint`] - Checkpoint loading and format detection
//! - [`checksum`] - SHA-256 checksums for checkpoints and artifacts
//! - [`export`] - The batch export driver and run summary
//!
//! # Export Workflow
//!
//! For each job, in order:
//!
//! 1. **Cancel check**: Stop starting new jobs once shutdown is requested
//! 2. **Load**: Verify the checkpoint exists and is a recognized format
//! 3. **Plan**: Resolve the artifact path and apply the existing-artifact policy
//! 4. **Export**: Invoke the configured exporter
//! 5. **Verify**: Confirm the artifact exists and checksum it
//! 6. **Report**: Record the result in the run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use pt2onnx::adapters::exporter::create_exporter;
//! use pt2onnx::config::load_config;
//! use pt2onnx::core::export::{DriverSettings, ExportDriver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pt2onnx.toml")?;
//! let jobs = config.build_jobs()?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let exporter = create_exporter(&config.exporter)?;
//! let driver = ExportDriver::new(exporter, DriverSettings::from_config(&config.export), shutdown_rx);
//!
//! let summary = driver.run(&jobs).await;
//! println!("Total: {}", summary.total());
//! println!("Successful: {}", summary.successful());
//! println!("Failed: {}", summary.failed());
//! # Ok(())
//! # }
//! ```

pub mod checkpoint;
pub mod checksum;
pub mod export;
