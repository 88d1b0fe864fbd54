//! File-backed byte-range source
//!
//! `FileSource` bundles an open handle with the size taken from its metadata at open
//! time. It is the size/offset provider the CLI uses in front of the splitter.

use crate::error::{Result, ReadlinesError};
use crate::source::validation::validate_file_path;
use crate::splitter::{LineSplitter, SplitterOptions};
use std::fs::File;
use std::path::{Path, PathBuf};

/// An open file plus the total size the splitter will read up to
#[derive(Debug)]
pub struct FileSource {
    /// Open handle, read positionally
    file: File,

    /// File size in bytes (snapshot from metadata at open time)
    file_size: u64,

    /// Path the handle was opened from, kept for messages
    path: PathBuf,
}

impl FileSource {
    /// Validate and open `path`
    ///
    /// # Errors
    /// * `FileNotFound` / `NotAFile` from validation
    /// * `FileError` if the handle or its metadata cannot be obtained
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        validate_file_path(path)?;

        let file = File::open(path).map_err(|e| {
            ReadlinesError::file_error(format!("Failed to open file: {}", path.display()), e)
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| ReadlinesError::file_error("Failed to get file metadata", e))?
            .len();

        log::debug!("opened {} ({} bytes)", path.display(), file_size);

        Ok(Self {
            file,
            file_size,
            path: path.to_path_buf(),
        })
    }

    /// Total size in bytes as seen at open time
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Path this source was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start a fresh traversal over the file
    ///
    /// Each call creates an independent splitter with its own cursor; nothing from a
    /// previous traversal is remembered.
    pub fn lines(&self, options: SplitterOptions) -> Result<LineSplitter<&File>> {
        LineSplitter::new(&self.file, self.file_size, options)
    }

    /// Consume the source, returning a splitter that owns the handle
    pub fn into_lines(self, options: SplitterOptions) -> Result<LineSplitter<File>> {
        LineSplitter::new(self.file, self.file_size, options)
    }
}
