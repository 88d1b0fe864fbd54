//! File validation utilities for ensuring paths can back a line splitter.
//!
//! These checks run before a [`FileSource`](super::FileSource) opens its handle so
//! that the common mistakes produce a specific error instead of a bare io::Error.

use crate::error::{Result, ReadlinesError};
use std::path::Path;

/// Validate that a file path is accessible and suitable for line reading
///
/// # Validations Performed
/// - Path exists
/// - Path is a regular file (not a directory)
///
/// Readability is left to the caller's own open, which reports permission errors.
/// Empty files pass: they simply yield no lines.
pub fn validate_file_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ReadlinesError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| ReadlinesError::file_error("Failed to read file metadata", e))?;

    if !metadata.is_file() {
        return Err(ReadlinesError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}
