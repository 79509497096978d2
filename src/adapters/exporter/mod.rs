//! Exporter abstraction
//!
//! The `ModelExporter` trait defines the common interface, and the factory
//! picks the concrete backend from configuration.

pub mod factory;
mod r#trait;

pub use factory::create_exporter;
pub use r#trait::ModelExporter;
