//! Export job definition
//!
//! An [`ExportJob`] describes one checkpoint to export and how. Jobs are
//! validated on construction and cannot be changed afterwards.

use super::errors::JobError;
use super::format::ExportFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Input tensor spatial resolution
///
/// Parsed from `"1024,1280"`, `"1024x1280"` or a single `"640"` for a square
/// input. In TOML it may be written as `[1024, 1280]` or `640`.
///
/// An `ImageSize` itself may hold zero dimensions; [`ExportJob`] construction
/// rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ImageSizeRepr", into = "[u32; 2]")]
pub struct ImageSize {
    /// Input height in pixels
    pub height: u32,
    /// Input width in pixels
    pub width: u32,
}

impl ImageSize {
    /// Creates an image size from height and width
    pub fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// Creates a square image size
    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Whether both dimensions are positive
    pub fn is_valid(&self) -> bool {
        self.height > 0 && self.width > 0
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.height, self.width)
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_dim = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| format!("Invalid image size '{s}': '{}' is not a positive integer", part.trim()))
        };

        let parts: Vec<&str> = s.split(|c| c == ',' || c == 'x' || c == 'X').collect();
        match parts.as_slice() {
            [side] => Ok(Self::square(parse_dim(side)?)),
            [height, width] => Ok(Self::new(parse_dim(height)?, parse_dim(width)?)),
            _ => Err(format!(
                "Invalid image size '{s}'. Expected HEIGHT,WIDTH, HEIGHTxWIDTH or a single SIDE"
            )),
        }
    }
}

impl From<ImageSize> for [u32; 2] {
    fn from(size: ImageSize) -> Self {
        [size.height, size.width]
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImageSizeRepr {
    Square(u32),
    Pair([u32; 2]),
    Text(String),
}

impl TryFrom<ImageSizeRepr> for ImageSize {
    type Error = String;

    fn try_from(repr: ImageSizeRepr) -> Result<Self, Self::Error> {
        match repr {
            ImageSizeRepr::Square(side) => Ok(Self::square(side)),
            ImageSizeRepr::Pair([height, width]) => Ok(Self::new(height, width)),
            ImageSizeRepr::Text(text) => Self::from_str(&text),
        }
    }
}

/// One checkpoint export
///
/// # Examples
///
/// ```
/// use pt2onnx::domain::{ExportFormat, ExportJob, ImageSize};
///
/// let job = ExportJob::new(
///     "weights/car_detect.pt",
///     ExportFormat::Onnx,
///     true,
///     ImageSize::new(1024, 1280),
/// )
/// .unwrap();
///
/// assert_eq!(job.artifact_path().to_str(), Some("weights/car_detect.onnx"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportJob {
    source_checkpoint_path: PathBuf,
    output_format: ExportFormat,
    simplify: bool,
    image_size: ImageSize,
    #[serde(skip_serializing_if = "Option::is_none")]
    opset: Option<u32>,
    half: bool,
    dynamic: bool,
}

impl ExportJob {
    /// Creates a job with the required settings and no optional exporter knobs
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Configuration`] if the image size has a zero
    /// dimension or `simplify` is requested for a format that does not run
    /// the graph simplifier.
    pub fn new(
        source_checkpoint_path: impl Into<PathBuf>,
        output_format: ExportFormat,
        simplify: bool,
        image_size: ImageSize,
    ) -> Result<Self, JobError> {
        ExportJobBuilder::new(source_checkpoint_path)
            .output_format(output_format)
            .simplify(simplify)
            .image_size(image_size)
            .build()
    }

    /// Path of the checkpoint to export
    pub fn source_checkpoint_path(&self) -> &Path {
        &self.source_checkpoint_path
    }

    /// Target format
    pub fn output_format(&self) -> ExportFormat {
        self.output_format
    }

    /// Whether the graph simplifier runs after export
    pub fn simplify(&self) -> bool {
        self.simplify
    }

    /// Fixed input resolution
    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    /// ONNX opset override
    pub fn opset(&self) -> Option<u32> {
        self.opset
    }

    /// FP16 export
    pub fn half(&self) -> bool {
        self.half
    }

    /// Dynamic input axes
    pub fn dynamic(&self) -> bool {
        self.dynamic
    }

    /// Where the exporter writes this job's artifact
    pub fn artifact_path(&self) -> PathBuf {
        self.output_format
            .artifact_path(&self.source_checkpoint_path)
    }
}

impl fmt::Display for ExportJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (imgsz={}, simplify={})",
            self.source_checkpoint_path.display(),
            self.output_format,
            self.image_size,
            self.simplify
        )
    }
}

/// Builder for [`ExportJob`]
///
/// Defaults: ONNX, simplify on, 1024x1280, no opset override, FP32, static axes.
#[derive(Debug, Clone)]
pub struct ExportJobBuilder {
    source_checkpoint_path: PathBuf,
    output_format: ExportFormat,
    simplify: bool,
    image_size: ImageSize,
    opset: Option<u32>,
    half: bool,
    dynamic: bool,
}

impl ExportJobBuilder {
    /// Starts a builder for the given checkpoint
    pub fn new(source_checkpoint_path: impl Into<PathBuf>) -> Self {
        Self {
            source_checkpoint_path: source_checkpoint_path.into(),
            output_format: ExportFormat::Onnx,
            simplify: true,
            image_size: ImageSize::new(1024, 1280),
            opset: None,
            half: false,
            dynamic: false,
        }
    }

    /// Sets the target format
    pub fn output_format(mut self, format: ExportFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Enables or disables graph simplification
    pub fn simplify(mut self, simplify: bool) -> Self {
        self.simplify = simplify;
        self
    }

    /// Sets the input resolution
    pub fn image_size(mut self, image_size: ImageSize) -> Self {
        self.image_size = image_size;
        self
    }

    /// Sets the ONNX opset
    pub fn opset(mut self, opset: Option<u32>) -> Self {
        self.opset = opset;
        self
    }

    /// Enables FP16 export
    pub fn half(mut self, half: bool) -> Self {
        self.half = half;
        self
    }

    /// Enables dynamic input axes
    pub fn dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    /// Validates and builds the job
    ///
    /// Validation never touches the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Configuration`] for an empty checkpoint path, a
    /// zero image dimension, a zero opset, or `simplify` on a format without
    /// a simplifier.
    pub fn build(self) -> Result<ExportJob, JobError> {
        if self.source_checkpoint_path.as_os_str().is_empty() {
            return Err(JobError::Configuration(
                "checkpoint path cannot be empty".to_string(),
            ));
        }

        if !self.image_size.is_valid() {
            return Err(JobError::Configuration(format!(
                "image size must have positive height and width, got {}x{}",
                self.image_size.height, self.image_size.width
            )));
        }

        if self.simplify && !self.output_format.supports_simplify() {
            return Err(JobError::Configuration(format!(
                "simplify is not supported for format '{}'",
                self.output_format
            )));
        }

        if self.opset == Some(0) {
            return Err(JobError::Configuration(
                "opset must be a positive integer".to_string(),
            ));
        }

        Ok(ExportJob {
            source_checkpoint_path: self.source_checkpoint_path,
            output_format: self.output_format,
            simplify: self.simplify,
            image_size: self.image_size,
            opset: self.opset,
            half: self.half,
            dynamic: self.dynamic,
        })
    }
}
