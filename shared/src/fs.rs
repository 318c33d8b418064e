//! Filesystem helpers shared across webscene tools.

use std::path::Path;

use anyhow::{Context, Result};

/// Maximum allowed size for a mesh record read back into memory.
pub const MAX_RECORD_BYTES: u64 = 256 * 1024 * 1024; // 256 MiB
/// Maximum allowed size for a bundled runtime asset.
pub const MAX_RUNTIME_ASSET_BYTES: u64 = 16 * 1024 * 1024; // 16 MiB

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

/// Write `contents` to `path` unless a file already exists there.
///
/// Returns `true` when the file was written. Existing files are never
/// touched, so repeated calls are idempotent.
pub fn write_if_missing(path: &Path, contents: &[u8]) -> Result<bool> {
    if path.is_file() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(true)
}
