//! Ultralytics backend
//!
//! Drives the `yolo` command-line tool shipped with the `ultralytics` Python
//! package.

pub mod exporter;

pub use exporter::UltralyticsExporter;
