use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("token file not found: {path}")]
    MissingInput { path: PathBuf },
    #[error("failed to read token file: {path}")]
    ReadInput { path: PathBuf, source: io::Error },
    #[error("failed to write stylesheet: {path}")]
    WriteOutput { path: PathBuf, source: io::Error },
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

pub fn read_document(path: &Path) -> StorageResult<String> {
    if !path.exists() {
        return Err(StorageError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).map_err(|source| StorageError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `css` to `path`, creating parent directories as needed.
pub fn write_stylesheet(path: &Path, css: &str) -> StorageResult<()> {
    let write_error = |source| StorageError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, css).map_err(write_error)?;
    tracing::debug!(path = %path.display(), bytes = css.len(), "stylesheet written");
    Ok(())
}
