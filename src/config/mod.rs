//! Configuration management for pt2onnx.
//!
//! # Overview
//!
//! pt2onnx uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PT2ONNX_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation of every job before anything is exported
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ExporterConfig`] - External exporter program, device, timeout
//! - [`ExportConfig`] - Existing-artifact policy, dry run, report path
//! - [`JobDefaults`] - Format, simplify, image size shared by all jobs
//! - [`JobConfig`] - One checkpoint and its overrides
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [exporter]
//! program = "yolo"
//! device = "cpu"
//!
//! [defaults]
//! format = "onnx"
//! simplify = true
//! image_size = [1024, 1280]
//!
//! [[jobs]]
//! checkpoint = "${WEIGHTS_DIR}/car_detect.pt"
//!
//! [[jobs]]
//! checkpoint = "${WEIGHTS_DIR}/car_classification.pt"
//! ```
//!
//! ```rust,no_run
//! use pt2onnx::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pt2onnx.toml")?;
//! for job in config.build_jobs()? {
//!     println!("{job}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;

pub use loader::{default_config, load_config};
pub use schema::{
    ApplicationConfig, ExistingArtifactPolicy, ExportConfig, ExporterConfig, JobConfig,
    JobDefaults, LoggingConfig, Pt2OnnxConfig,
};
