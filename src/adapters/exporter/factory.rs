//! Exporter factory
//!
//! Creates the configured exporter backend behind the [`ModelExporter`] trait.

use super::r#trait::ModelExporter;
use crate::adapters::ultralytics::UltralyticsExporter;
use crate::config::ExporterConfig;
use crate::domain::{Pt2OnnxError, Result};
use std::sync::Arc;

/// Create an exporter from configuration
///
/// # Errors
///
/// Returns an error if the backend is unknown.
///
/// # Example
///
/// ```
/// use pt2onnx::adapters::exporter::create_exporter;
/// use pt2onnx::config::ExporterConfig;
///
/// let exporter = create_exporter(&ExporterConfig::default()).unwrap();
/// assert_eq!(exporter.name(), "ultralytics");
/// ```
pub fn create_exporter(config: &ExporterConfig) -> Result<Arc<dyn ModelExporter>> {
    match config.backend.to_lowercase().as_str() {
        "ultralytics" => {
            tracing::debug!(
                program = %config.program,
                device = ?config.device,
                timeout_secs = config.timeout_secs,
                "Creating Ultralytics exporter"
            );
            Ok(Arc::new(UltralyticsExporter::new(config)))
        }
        other => Err(Pt2OnnxError::Exporter(format!(
            "Unsupported exporter backend: {other}. Supported backends: ultralytics"
        ))),
    }
}
