//! Atomic JSON file replacement.

use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{SyncError, SyncResult};

/// Serialize with 4-space indentation. Non-ASCII text is written as-is.
pub fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}

/// Replace `path` with `bytes` so readers see either the old or the new
/// content, never a partial write.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Serialize and atomically write a document.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> SyncResult<()> {
    let bytes = to_pretty_json(value).map_err(|e| SyncError::Corrupt(e.to_string()))?;
    write_atomic(path, &bytes).map_err(|e| SyncError::io(path, e))
}
