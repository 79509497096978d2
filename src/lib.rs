// pt2onnx - Batch model checkpoint exporter
// Copyright (c) 2025 pt2onnx Contributors
// Licensed under the MIT License

//! # pt2onnx - batch checkpoint export
//!
//! pt2onnx converts trained model checkpoints (PyTorch `.pt` files) into
//! deployable inference-graph artifacts such as ONNX, one job at a time, with
//! per-job failure isolation and an aggregate result.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Describing** export jobs (format, simplify, input size) with validation
//! - **Loading** checkpoints and recognizing their serialization format
//! - **Exporting** through an external toolkit behind the [`adapters::exporter::ModelExporter`] trait
//! - **Reporting** per-job results with SHA-256 checksums
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Checkpoint loading, checksums and the batch export driver
//! - [`adapters`] - External exporter backends (Ultralytics)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pt2onnx::adapters::exporter::create_exporter;
//! use pt2onnx::config::ExporterConfig;
//! use pt2onnx::core::export::{DriverSettings, ExportDriver};
//! use pt2onnx::domain::{ExportFormat, ExportJob, ImageSize};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let jobs = ["weights/car_detect.pt", "weights/car_classification.pt"]
//!         .into_iter()
//!         .map(|path| ExportJob::new(path, ExportFormat::Onnx, true, ImageSize::new(1024, 1280)))
//!         .collect::<Result<Vec<_>, _>>()?;
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let exporter = create_exporter(&ExporterConfig::default())?;
//!     let driver = ExportDriver::new(exporter, DriverSettings::default(), shutdown_rx);
//!
//!     let summary = driver.run(&jobs).await;
//!     for result in &summary.results {
//!         println!("{}: {:?}", result.job, result.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Process-level failures use [`domain::Pt2OnnxError`]. A failing job never
//! aborts the batch; its [`domain::JobError`] is recorded in the job's result.
//!
//! ## Logging
//!
//! pt2onnx uses structured logging with the `tracing` crate; see [`logging`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
