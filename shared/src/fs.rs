//! Filesystem helpers shared across memblob tools.

use std::path::Path;

use anyhow::{Context, Result};

/// Maximum allowed blob size for reading into memory.
pub const MAX_BLOB_BYTES: u64 = 1024 * 1024 * 1024; // 1 GiB
/// Maximum allowed source image size for shader constant conversion.
pub const MAX_IMAGE_BYTES: u64 = 32 * 1024 * 1024; // 32 MiB

/// Read a file into memory with a size cap.
pub fn read_file_with_limit(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;
    let len = metadata.len();
    if len > max_bytes {
        anyhow::bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            len,
            max_bytes
        );
    }
    std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
}
