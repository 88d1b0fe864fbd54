//! Reader configuration
//!
//! Defaults mirror [`SplitterOptions::default`]. With the `config` feature the values
//! can also come from `<config_dir>/readlines/config.toml`:
//!
//! ```toml
//! [reader]
//! buffer_size = 65536
//! start_offset = 0
//! ```

use crate::splitter::{SplitterOptions, DEFAULT_BUFFER_SIZE};

#[cfg(feature = "config")]
use crate::error::{Result, ReadlinesError};
#[cfg(feature = "config")]
use std::path::{Path, PathBuf};

/// Settings for one traversal
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ReaderConfig {
    /// Bytes requested per read
    pub buffer_size: usize,
    /// Offset to resume from
    pub start_offset: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            start_offset: 0,
        }
    }
}

impl From<&ReaderConfig> for SplitterOptions {
    fn from(config: &ReaderConfig) -> Self {
        SplitterOptions::new(config.buffer_size, config.start_offset)
    }
}

impl ReaderConfig {
    /// Options for a splitter built from this configuration
    pub fn options(&self) -> SplitterOptions {
        self.into()
    }
}

#[cfg(feature = "config")]
#[derive(Debug, Default, serde::Deserialize)]
struct ConfigFile {
    #[serde(default)]
    reader: ReaderConfig,
}

#[cfg(feature = "config")]
impl ReaderConfig {
    /// Default location of the configuration file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("readlines").join("config.toml"))
    }

    /// Load from the default location; a missing file yields the defaults
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReadlinesError::file_error(format!("Failed to read config: {}", path.display()), e)
        })?;
        log::debug!("loading configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Parse the `[reader]` section of a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(text).map_err(|e| ReadlinesError::config(e.to_string()))?;
        if file.reader.buffer_size == 0 {
            return Err(ReadlinesError::config("reader.buffer_size must be greater than zero"));
        }
        Ok(file.reader)
    }
}
