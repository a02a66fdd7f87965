//! HMIC / HMIC7 containers.
//!
//! HMIC is the plain text. HMIC7 is the same text through zstd. Both
//! parsers read through [`Source`], which hides the difference: an HMIC7
//! file is decompressed as a stream, never materialized.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{HmicError, Result};

/// First four bytes of every zstd frame.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Default zstd level for HMIC7 output.
pub const DEFAULT_LEVEL: i32 = 3;

/// On-disk container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    #[default]
    Hmic,
    Hmic7,
}

impl Container {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Container::Hmic => "hmic",
            Container::Hmic7 => "hmic7",
        }
    }

    /// Container implied by a path's extension, if any.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("hmic7") {
            Some(Container::Hmic7)
        } else if ext.eq_ignore_ascii_case("hmic") {
            Some(Container::Hmic)
        } else {
            None
        }
    }

    /// Detect the container of an existing file: `.hmic7` extension or a
    /// leading zstd magic number means HMIC7, anything else is plain.
    pub fn detect(path: &Path) -> Result<Self> {
        if let Some(Container::Hmic7) = Self::from_extension(path) {
            return Ok(Container::Hmic7);
        }

        let mut file = File::open(path).map_err(|e| HmicError::io(path, "Failed to open", e))?;
        let mut magic = [0u8; 4];
        let mut filled = 0;
        while filled < magic.len() {
            match file.read(&mut magic[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HmicError::io(path, "Failed to read", e)),
            }
        }

        Ok(if filled == magic.len() && magic == ZSTD_MAGIC {
            Container::Hmic7
        } else {
            Container::Hmic
        })
    }
}

/// A file that can be opened (and re-opened) as plain HMIC bytes.
#[derive(Debug, Clone)]
pub struct Source {
    path: PathBuf,
    container: Container,
}

impl Source {
    /// Detect the container and confirm the file can be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let container = Container::detect(path)?;
        let source = Self {
            path: path.to_path_buf(),
            container,
        };
        source.reader()?;
        Ok(source)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn container(&self) -> Container {
        self.container
    }

    /// A fresh reader positioned at the start of the plain text.
    pub fn reader(&self) -> Result<Box<dyn Read>> {
        let file =
            File::open(&self.path).map_err(|e| HmicError::io(&self.path, "Failed to open", e))?;
        match self.container {
            Container::Hmic => Ok(Box::new(file)),
            Container::Hmic7 => {
                let decoder = zstd::stream::read::Decoder::new(file)
                    .map_err(|e| HmicError::io(&self.path, "Failed to start decompression", e))?;
                Ok(Box::new(decoder))
            }
        }
    }

    /// Read the whole plain text into memory.
    pub fn read_all(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.reader()?
            .read_to_end(&mut bytes)
            .map_err(|e| HmicError::io(&self.path, "Failed to read", e))?;
        Ok(bytes)
    }
}

/// Output file for encoded text, compressing when the container is HMIC7.
pub enum Sink {
    Plain(BufWriter<File>),
    Compressed(zstd::stream::write::Encoder<'static, BufWriter<File>>),
}

impl Sink {
    /// Create (truncate) `path` for writing.
    pub fn create(path: &Path, container: Container, level: i32) -> Result<Self> {
        let file = File::create(path).map_err(|e| HmicError::io(path, "Failed to create", e))?;
        let writer = BufWriter::new(file);
        match container {
            Container::Hmic => Ok(Sink::Plain(writer)),
            Container::Hmic7 => {
                let encoder = zstd::stream::write::Encoder::new(writer, level)
                    .map_err(|e| HmicError::io(path, "Failed to start compression", e))?;
                Ok(Sink::Compressed(encoder))
            }
        }
    }

    /// Flush everything, finishing the zstd frame for HMIC7.
    pub fn finish(self) -> io::Result<()> {
        match self {
            Sink::Plain(mut writer) => writer.flush(),
            Sink::Compressed(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Plain(writer) => writer.write(buf),
            Sink::Compressed(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Plain(writer) => writer.flush(),
            Sink::Compressed(encoder) => encoder.flush(),
        }
    }
}

/// Compress plain HMIC text into an HMIC7 byte stream.
pub fn compress(text: &[u8], level: i32) -> Result<Vec<u8>> {
    Ok(zstd::stream::encode_all(text, level)?)
}

/// Decompress an HMIC7 byte stream into plain HMIC text.
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    Ok(zstd::stream::decode_all(bytes)?)
}
