//! Batch export orchestration
//!
//! This module provides:
//! - The batch export driver
//! - Summary and reporting

pub mod driver;
pub mod summary;

pub use driver::{DriverSettings, ExportDriver};
pub use summary::ExportSummary;
