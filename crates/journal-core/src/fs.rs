//! Filesystem helpers for atomic writes.
//!
//! Preference files and exported PDFs are written to a sibling temp file
//! first and renamed into place, so a crash never leaves a half-written file
//! under the final name.

use std::fs;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{JournalError, Result};

/// Write `data` to `path` via a temp file in the same directory.
///
/// Parent directories are created when missing.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| JournalError::Storage(format!("Invalid path: {}", path.display())))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)?;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| JournalError::Storage(format!("System time error: {}", e)))?
        .as_nanos();
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| JournalError::Storage(format!("Invalid filename: {}", path.display())))?;
    let temp_path = parent.join(format!(".{}.{}.tmp", filename, nanos));

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(|e| JournalError::Storage(format!("Temp file create failed: {}", e)))?;
    if let Err(err) = file.write_all(data).and_then(|_| file.sync_all()) {
        let _ = fs::remove_file(&temp_path);
        return Err(JournalError::Storage(format!("Temp file write failed: {}", err)));
    }
    drop(file);

    rename_with_fallback(&temp_path, path)
        .map_err(|e| JournalError::Storage(format!("Atomic rename failed: {}", e)))?;

    Ok(())
}

/// Rename a file, removing the destination first when the platform refuses
/// to overwrite it.
///
/// If the rename ultimately fails, the temp file is cleaned up.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}
