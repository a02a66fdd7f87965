//! Project configuration (hmic.yaml).
//!
//! Every field is optional; CLI flags override what the file sets.
//!
//! ```yaml
//! format: hmic7
//! compression_level: 9
//! chunk_size: 4096
//! parser: streaming
//! fps: 12
//! looping: false
//! output: out/
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::container::{Container, DEFAULT_LEVEL};
use crate::error::{HmicError, Result};
use crate::media::MediaOptions;
use crate::parser::{ParserKind, DEFAULT_CHUNK_SIZE};

/// Config file looked for in the working directory.
pub const CONFIG_FILENAME: &str = "hmic.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Container for encoded output.
    pub format: Container,

    /// zstd level for HMIC7 output.
    pub compression_level: i32,

    /// Read size for the streaming parser.
    pub chunk_size: usize,

    /// Parser used by `info`, `render` and `validate`.
    pub parser: ParserKind,

    /// Frame rate for image-sequence inputs.
    pub fps: u32,

    /// LOOP flag for sequences and GIFs without a loop extension.
    pub looping: bool,

    /// Directory encoded files are written to when no output path is given.
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Container::Hmic,
            compression_level: DEFAULT_LEVEL,
            chunk_size: DEFAULT_CHUNK_SIZE,
            parser: ParserKind::Whole,
            fps: 24,
            looping: true,
            output: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HmicError::io(path, "Failed to read config", e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| HmicError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Explicit path if given, else `hmic.yaml` in `dir` if present, else defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "loading config");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject values no command can use.
    pub fn validate(&self) -> Result<()> {
        let levels = zstd::compression_level_range();
        if !levels.contains(&self.compression_level) {
            return Err(HmicError::Config {
                message: format!("compression_level {} is out of range", self.compression_level),
                help: Some(format!(
                    "zstd accepts {} to {}",
                    levels.start(),
                    levels.end()
                )),
            });
        }
        if self.chunk_size == 0 {
            return Err(HmicError::Config {
                message: "chunk_size must be at least 1".to_string(),
                help: None,
            });
        }
        if self.fps == 0 {
            return Err(HmicError::Config {
                message: "fps must be at least 1".to_string(),
                help: None,
            });
        }
        Ok(())
    }

    pub fn media_options(&self) -> MediaOptions {
        MediaOptions {
            fps: self.fps,
            looping: self.looping,
        }
    }
}
