//! # readlines - Chunked Line Reader
//!
//! Reads arbitrarily large files line by line without loading them into memory.
//! Lines are split on LF, CR and CR+LF and delivered as raw bytes with the
//! terminator stripped.
//!
//! ## Features
//!
//! - **Bounded memory**: one reusable chunk buffer plus the current line
//! - **Boundary safe**: a CR+LF pair split across two reads is still one terminator
//! - **Positional reads**: chunks are read at explicit offsets, so a traversal can
//!   resume from any byte offset
//! - **Undecoded output**: callers decide how to interpret line bytes
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`source`] - Byte-range readers and the file-backed source
//! - [`splitter`] - The chunked line splitting engine
//! - [`config`] - Reader configuration (file support behind the `config` feature)

pub mod config;
pub mod error;
pub mod source;
pub mod splitter;

// Re-export commonly used types for convenience
pub use config::ReaderConfig;
pub use error::{ReadlinesError, Result};
pub use source::{ByteRangeReader, FileSource};
pub use splitter::{readlines, LineSplitter, SplitterOptions, DEFAULT_BUFFER_SIZE};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
