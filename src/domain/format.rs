//! Export formats and the exporter's artifact naming convention

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Target format of an export
///
/// The string forms match the format names the Ultralytics exporter accepts.
///
/// # Examples
///
/// ```
/// use pt2onnx::domain::ExportFormat;
/// use std::path::Path;
/// use std::str::FromStr;
///
/// let format = ExportFormat::from_str("ONNX").unwrap();
/// assert_eq!(format, ExportFormat::Onnx);
/// assert_eq!(
///     format.artifact_path(Path::new("weights/car_detect.pt")),
///     Path::new("weights/car_detect.onnx")
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ExportFormat {
    /// ONNX graph (`.onnx`)
    Onnx,
    /// TorchScript module (`.torchscript`)
    TorchScript,
    /// TensorRT engine (`.engine`), built through ONNX
    Engine,
    /// OpenVINO IR directory (`*_openvino_model/`)
    OpenVino,
    /// CoreML package (`.mlpackage`)
    CoreMl,
    /// NCNN model directory (`*_ncnn_model/`)
    Ncnn,
}

impl ExportFormat {
    /// All formats, in declaration order
    pub const ALL: [ExportFormat; 6] = [
        ExportFormat::Onnx,
        ExportFormat::TorchScript,
        ExportFormat::Engine,
        ExportFormat::OpenVino,
        ExportFormat::CoreMl,
        ExportFormat::Ncnn,
    ];

    /// Format name as passed to the exporter
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Onnx => "onnx",
            ExportFormat::TorchScript => "torchscript",
            ExportFormat::Engine => "engine",
            ExportFormat::OpenVino => "openvino",
            ExportFormat::CoreMl => "coreml",
            ExportFormat::Ncnn => "ncnn",
        }
    }

    /// Whether the ONNX graph simplifier runs for this format
    pub fn supports_simplify(&self) -> bool {
        matches!(self, ExportFormat::Onnx | ExportFormat::Engine)
    }

    /// Whether the artifact is a directory rather than a single file
    pub fn is_directory_artifact(&self) -> bool {
        matches!(
            self,
            ExportFormat::OpenVino | ExportFormat::CoreMl | ExportFormat::Ncnn
        )
    }

    /// Path the exporter writes the artifact to for a given checkpoint
    ///
    /// Artifacts land next to the checkpoint. Single-file formats swap the
    /// extension; directory formats append a `_<format>_model` suffix to the
    /// file stem.
    pub fn artifact_path(&self, checkpoint: &Path) -> PathBuf {
        match self {
            ExportFormat::Onnx => checkpoint.with_extension("onnx"),
            ExportFormat::TorchScript => checkpoint.with_extension("torchscript"),
            ExportFormat::Engine => checkpoint.with_extension("engine"),
            ExportFormat::CoreMl => checkpoint.with_extension("mlpackage"),
            ExportFormat::OpenVino | ExportFormat::Ncnn => {
                let stem = checkpoint
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                checkpoint.with_file_name(format!("{stem}_{}_model", self.as_str()))
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        ExportFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == normalized)
            .ok_or_else(|| {
                let supported: Vec<&str> = ExportFormat::ALL.iter().map(|f| f.as_str()).collect();
                format!(
                    "Unsupported export format '{}'. Must be one of: {}",
                    s,
                    supported.join(", ")
                )
            })
    }
}

impl TryFrom<String> for ExportFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("onnx", ExportFormat::Onnx ; "onnx")]
    #[test_case("ONNX", ExportFormat::Onnx ; "uppercase")]
    #[test_case(" torchscript ", ExportFormat::TorchScript ; "padded")]
    #[test_case("engine", ExportFormat::Engine ; "engine")]
    #[test_case("OpenVINO", ExportFormat::OpenVino ; "openvino")]
    #[test_case("coreml", ExportFormat::CoreMl ; "coreml")]
    #[test_case("ncnn", ExportFormat::Ncnn ; "ncnn")]
    fn test_parse_format(input: &str, expected: ExportFormat) {
        assert_eq!(ExportFormat::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_format() {
        let err = ExportFormat::from_str("tflite_micro").unwrap_err();
        assert!(err.contains("Unsupported export format"));
        assert!(err.contains("onnx"));
    }

    #[test_case(ExportFormat::Onnx, "weights/car_detect.onnx" ; "onnx")]
    #[test_case(ExportFormat::TorchScript, "weights/car_detect.torchscript" ; "torchscript")]
    #[test_case(ExportFormat::Engine, "weights/car_detect.engine" ; "engine")]
    #[test_case(ExportFormat::CoreMl, "weights/car_detect.mlpackage" ; "coreml")]
    #[test_case(ExportFormat::OpenVino, "weights/car_detect_openvino_model" ; "openvino")]
    #[test_case(ExportFormat::Ncnn, "weights/car_detect_ncnn_model" ; "ncnn")]
    fn test_artifact_path(format: ExportFormat, expected: &str) {
        let checkpoint = Path::new("weights/car_detect.pt");
        assert_eq!(format.artifact_path(checkpoint), PathBuf::from(expected));
    }

    #[test]
    fn test_artifact_path_without_extension() {
        let checkpoint = Path::new("car_classification");
        assert_eq!(
            ExportFormat::Onnx.artifact_path(checkpoint),
            PathBuf::from("car_classification.onnx")
        );
    }

    #[test]
    fn test_simplify_support() {
        assert!(ExportFormat::Onnx.supports_simplify());
        assert!(ExportFormat::Engine.supports_simplify());
        assert!(!ExportFormat::TorchScript.supports_simplify());
        assert!(!ExportFormat::OpenVino.supports_simplify());
    }

    #[test]
    fn test_serde_names_match_display() {
        for format in ExportFormat::ALL {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{format}\""));
            let back: ExportFormat = serde_json::from_str(&json).unwrap();
            assert_eq!(back, format);
        }
    }

    #[test]
    fn test_deserialize_is_case_insensitive() {
        let format: ExportFormat = serde_json::from_str("\"OpenVINO\"").unwrap();
        assert_eq!(format, ExportFormat::OpenVino);
        assert!(serde_json::from_str::<ExportFormat>("\"pb\"").is_err());
    }
}
