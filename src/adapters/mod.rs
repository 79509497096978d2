//! External toolkit integrations
//!
//! - [`exporter`] - Exporter abstraction (trait and factory)
//! - [`ultralytics`] - Ultralytics `yolo` CLI backend
//!
//! The export driver depends only on [`exporter::ModelExporter`], so tests
//! can substitute an in-process fake for the real toolkit.

pub mod exporter;
pub mod ultralytics;
