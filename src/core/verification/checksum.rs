//! Checksum calculation for produced archives

use crate::domain::{FolioError, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Calculate SHA-256 checksum of raw bytes
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
///
/// # Examples
///
/// ```
/// use folio::core::verification::checksum::calculate_checksum_bytes;
///
/// let checksum = calculate_checksum_bytes(b"abc");
/// assert_eq!(
///     checksum,
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}

/// Calculate SHA-256 checksum and size of a file
///
/// The file is streamed in fixed-size chunks.
pub async fn calculate_checksum_file(path: impl AsRef<Path>) -> Result<(String, u64)> {
    let path = path.as_ref();
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| FolioError::io_at(path, e))?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 64 * 1024];
    let mut total = 0u64;
    loop {
        let read = file
            .read(&mut buffer)
            .await
            .map_err(|e| FolioError::io_at(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
        total += read as u64;
    }

    Ok((format!("{:x}", hasher.finalize()), total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_calculate_checksum_bytes() {
        let checksum = calculate_checksum_bytes(b"Hello, World!");
        assert_eq!(checksum.len(), 64);
        assert!(checksum.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_calculate_checksum_bytes_deterministic() {
        assert_eq!(
            calculate_checksum_bytes(b"Test data"),
            calculate_checksum_bytes(b"Test data")
        );
        assert_ne!(
            calculate_checksum_bytes(b"Test data"),
            calculate_checksum_bytes(b"Test datb")
        );
    }

    #[tokio::test]
    async fn test_file_checksum_matches_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site.zip");
        let contents = vec![7u8; 200_000];
        std::fs::write(&path, &contents).unwrap();

        let (checksum, size) = calculate_checksum_file(&path).await.unwrap();
        assert_eq!(checksum, calculate_checksum_bytes(&contents));
        assert_eq!(size, 200_000);
    }

    #[tokio::test]
    async fn test_file_checksum_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = calculate_checksum_file(dir.path().join("missing.zip"))
            .await
            .unwrap_err();
        assert!(matches!(err, FolioError::Io(_)));
    }
}
