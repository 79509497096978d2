//! Checkpoint loading
//!
//! Loading a checkpoint here means proving it is there, readable, and in a
//! serialization format the exporter understands, before the exporter is
//! started. The file is read exactly once and hashed on the way.

use crate::core::checksum::StreamingChecksum;
use crate::domain::JobError;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

const READ_BUFFER_SIZE: usize = 64 * 1024;
const MAGIC_LEN: usize = 4;
const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";
const PICKLE_PROTO: u8 = 0x80;

/// Serialization format of a checkpoint file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointKind {
    /// Zip container written by `torch.save` since torch 1.6
    ZipArchive,
    /// Bare pickle stream written by older `torch.save`
    LegacyPickle,
}

impl CheckpointKind {
    /// Identify the format from the leading bytes of a file
    pub fn detect(header: &[u8]) -> Option<Self> {
        if header.starts_with(ZIP_MAGIC) {
            return Some(CheckpointKind::ZipArchive);
        }
        match header {
            [PICKLE_PROTO, protocol, ..] if (2..=5).contains(protocol) => {
                Some(CheckpointKind::LegacyPickle)
            }
            _ => None,
        }
    }
}

/// A checkpoint that has been verified as loadable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    path: PathBuf,
    kind: CheckpointKind,
    size_bytes: u64,
    checksum: String,
}

impl Checkpoint {
    /// Load and verify a checkpoint
    ///
    /// # Errors
    ///
    /// Returns [`JobError::CheckpointLoad`] if the path does not exist, is not
    /// a regular file, cannot be read, or is not a recognized checkpoint.
    pub async fn load(path: &Path) -> Result<Self, JobError> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                JobError::CheckpointLoad(format!("checkpoint not found: {}", path.display()))
            }
            _ => JobError::CheckpointLoad(format!(
                "cannot access checkpoint {}: {e}",
                path.display()
            )),
        })?;

        if !metadata.is_file() {
            return Err(JobError::CheckpointLoad(format!(
                "checkpoint is not a file: {}",
                path.display()
            )));
        }

        let read_error = |e: std::io::Error| {
            JobError::CheckpointLoad(format!("cannot read checkpoint {}: {e}", path.display()))
        };

        let mut file = tokio::fs::File::open(path).await.map_err(read_error)?;
        let mut checksum = StreamingChecksum::new();
        let mut header = Vec::with_capacity(MAGIC_LEN);
        let mut buffer = vec![0u8; READ_BUFFER_SIZE];
        let mut size_bytes = 0u64;

        loop {
            let read = file.read(&mut buffer).await.map_err(read_error)?;
            if read == 0 {
                break;
            }
            if header.len() < MAGIC_LEN {
                let needed = (MAGIC_LEN - header.len()).min(read);
                header.extend_from_slice(&buffer[..needed]);
            }
            checksum.update(&buffer[..read]);
            size_bytes += read as u64;
        }

        let kind = CheckpointKind::detect(&header).ok_or_else(|| {
            JobError::CheckpointLoad(format!(
                "unrecognized checkpoint format: {}",
                path.display()
            ))
        })?;

        tracing::debug!(
            checkpoint = %path.display(),
            kind = ?kind,
            size_bytes,
            "Checkpoint verified"
        );

        Ok(Self {
            path: path.to_path_buf(),
            kind,
            size_bytes,
            checksum: checksum.finish(),
        })
    }

    /// Path the checkpoint was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Detected serialization format
    pub fn kind(&self) -> CheckpointKind {
        self.kind
    }

    /// File size in bytes
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Hex-encoded SHA-256 of the file contents
    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::checksum::calculate_checksum_bytes;
    use tempfile::TempDir;
    use test_case::test_case;

    #[test_case(b"PK\x03\x04rest", Some(CheckpointKind::ZipArchive) ; "zip")]
    #[test_case(b"\x80\x02\x8a\x0a", Some(CheckpointKind::LegacyPickle) ; "pickle protocol 2")]
    #[test_case(b"\x80\x05", Some(CheckpointKind::LegacyPickle) ; "pickle protocol 5")]
    #[test_case(b"\x80\x09", None ; "unknown pickle protocol")]
    #[test_case(b"# yaml", None ; "text file")]
    #[test_case(b"", None ; "empty")]
    fn test_detect_kind(header: &[u8], expected: Option<CheckpointKind>) {
        assert_eq!(CheckpointKind::detect(header), expected);
    }

    #[tokio::test]
    async fn test_load_zip_checkpoint() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("car_detect.pt");
        let contents = b"PK\x03\x04archive/data.pkl".to_vec();
        std::fs::write(&path, &contents).unwrap();

        let checkpoint = Checkpoint::load(&path).await.unwrap();
        assert_eq!(checkpoint.path(), path.as_path());
        assert_eq!(checkpoint.kind(), CheckpointKind::ZipArchive);
        assert_eq!(checkpoint.size_bytes(), contents.len() as u64);
        assert_eq!(checkpoint.checksum(), calculate_checksum_bytes(&contents));
    }

    #[tokio::test]
    async fn test_load_missing_checkpoint() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.pt");

        let err = Checkpoint::load(&path).await.unwrap_err();
        assert!(matches!(err, JobError::CheckpointLoad(ref msg) if msg.contains("not found")));
    }

    #[tokio::test]
    async fn test_load_directory_is_rejected() {
        let dir = TempDir::new().unwrap();

        let err = Checkpoint::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, JobError::CheckpointLoad(ref msg) if msg.contains("not a file")));
    }

    #[tokio::test]
    async fn test_load_unrecognized_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.pt");
        std::fs::write(&path, b"this is not a checkpoint").unwrap();

        let err = Checkpoint::load(&path).await.unwrap_err();
        assert!(matches!(err, JobError::CheckpointLoad(ref msg) if msg.contains("unrecognized")));
    }

    #[tokio::test]
    async fn test_load_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.pt");
        std::fs::write(&path, b"").unwrap();

        assert!(Checkpoint::load(&path).await.is_err());
    }
}
