//! Filesystem operations
//!
//! Opens files for transfers and checks directories, mapping not-found
//! apart from other I/O failures so handlers can pick the right reply.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs::{File, OpenOptions};

use crate::error::StorageError;

/// Opens a file for reading.
pub async fn open_read(path: &Path) -> Result<File, StorageError> {
    File::open(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
        _ => StorageError::Io(e),
    })
}

/// Creates a regular file for writing, truncating an existing one.
///
/// The parent directory must already exist; intermediate directories are
/// never created here.
pub async fn open_write(path: &Path) -> Result<File, StorageError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o644);
    options.open(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
        _ => StorageError::Io(e),
    })
}

/// Verifies that `path` names a traversable directory.
pub fn stat_dir(path: &Path) -> Result<(), StorageError> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
        _ => StorageError::Io(e),
    })?;
    if !metadata.is_dir() {
        return Err(StorageError::NotADirectory(path.display().to_string()));
    }
    Ok(())
}
