//! Domain models and types for pt2onnx.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Jobs** ([`ExportJob`], [`ExportJobBuilder`], [`ImageSize`], [`ExportFormat`])
//! - **Outcomes** ([`ExportResult`], [`ExportStatus`])
//! - **Error types** ([`Pt2OnnxError`], [`JobError`], [`ErrorKind`])
//! - **Result type alias** ([`Result`])
//!
//! # Validation
//!
//! Jobs are validated when they are built, without touching the filesystem:
//!
//! ```rust
//! use pt2onnx::domain::{ExportFormat, ExportJob, ImageSize, JobError};
//!
//! let err = ExportJob::new("model.pt", ExportFormat::Onnx, true, ImageSize::new(0, 640))
//!     .unwrap_err();
//! assert!(matches!(err, JobError::Configuration(_)));
//! ```

pub mod errors;
pub mod format;
pub mod job;
pub mod outcome;
pub mod result;

pub use errors::{ErrorKind, JobError, Pt2OnnxError};
pub use format::ExportFormat;
pub use job::{ExportJob, ExportJobBuilder, ImageSize};
pub use outcome::{ExportResult, ExportStatus};
pub use result::Result;
