//! Error types and handling infrastructure for readlines.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! the library error type. The binary wraps these in `anyhow` for context.
//!
//! ## Design Principles
//!
//! - **Fail fast**: invalid splitter parameters are rejected at construction
//! - **Context preservation**: read failures carry the offset and length of the chunk
//! - **No recovery**: nothing here retries, callers wrap the reader if they need that

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for readlines operations.
#[derive(Error, Debug)]
pub enum ReadlinesError {
    /// A chunk read from the byte-range source failed
    #[error("Failed to read {length} bytes at offset {offset}")]
    Io {
        offset: u64,
        length: usize,
        #[source]
        source: std::io::Error,
    },

    /// Chunk size of zero was requested
    #[error("Invalid buffer size: must be greater than zero")]
    InvalidBufferSize,

    /// Start offset lies beyond the end of the source
    #[error("Start offset {offset} is beyond the end of the source ({total_size} bytes)")]
    OffsetOutOfRange { offset: u64, total_size: u64 },

    /// File system related errors (open, metadata, permissions)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File not found specifically (common case for user feedback)
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Path exists but is not a regular file
    #[error("Path is not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

/// Standard Result type for readlines operations.
pub type Result<T> = std::result::Result<T, ReadlinesError>;

impl ReadlinesError {
    /// Create an Io error for a failed chunk read
    pub fn read_failed(offset: u64, length: usize, source: std::io::Error) -> Self {
        Self::Io {
            offset,
            length,
            source,
        }
    }

    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}
