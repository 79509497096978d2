//! Checksum calculation for checkpoints and exported artifacts
//!
//! Checksums let a report show that two runs of the same job produced
//! equivalent artifacts, and pin the exact checkpoint bytes an artifact was
//! built from.

use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Calculate SHA-256 checksum of raw bytes
///
/// # Returns
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
///
/// # Examples
///
/// ```
/// use pt2onnx::core::checksum::calculate_checksum_bytes;
///
/// let checksum = calculate_checksum_bytes(b"Hello, World!");
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}

/// Incremental SHA-256 over a stream of chunks
#[derive(Default)]
pub struct StreamingChecksum {
    hasher: Sha256,
}

impl StreamingChecksum {
    /// Start a new checksum
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk
    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    /// Hex-encoded digest
    pub fn finish(self) -> String {
        format!("{:x}", self.hasher.finalize())
    }
}

/// Calculate the SHA-256 checksum of a file, reading it in chunks
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be opened or read.
pub async fn calculate_file_checksum(path: &Path) -> std::io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut checksum = StreamingChecksum::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        checksum.update(&buffer[..read]);
    }

    Ok(checksum.finish())
}
