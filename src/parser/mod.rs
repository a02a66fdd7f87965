//! HMIC parsers.
//!
//! Two parsers share one grammar and produce the same [`Document`] for any
//! valid file:
//!
//! - [`WholeFileParser`] reads the whole file into memory and scans it.
//! - [`StreamingParser`] reads fixed-size chunks, so memory is bounded by
//!   the largest frame block rather than the file.
//!
//! Both accept plain HMIC and zstd-compressed HMIC7 (see
//! [`crate::container`]). Parsing is lenient: anything that does not match
//! the grammar is skipped and never an error.
//!
//! # Usage
//!
//! ```ignore
//! use hmic::parser::{StreamingParser, WholeFileParser};
//!
//! let doc = WholeFileParser::open("clip.hmic")?.parse()?;
//! let same = StreamingParser::open("clip.hmic")?.with_chunk_size(512).parse()?;
//! assert_eq!(doc, same);
//! ```
//!
//! [`Document`]: crate::types::Document

mod cancel;
pub mod grammar;
mod stream;
mod whole;
pub mod window;

pub use cancel::CancelToken;
pub use stream::{
    ChunkScanner, FrameScanner, HeaderScanner, StreamingParser, CARRY_BOUND, DEFAULT_CHUNK_SIZE,
};
pub use whole::WholeFileParser;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Document;

/// Which parser to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    #[default]
    Whole,
    Streaming,
}

/// Parse `path` with the selected parser.
pub fn parse_file(
    path: &Path,
    kind: ParserKind,
    chunk_size: usize,
    cancel: Option<CancelToken>,
) -> Result<Document> {
    match kind {
        ParserKind::Whole => {
            let mut parser = WholeFileParser::open(path)?;
            if let Some(token) = cancel {
                parser = parser.with_cancel(token);
            }
            parser.parse()
        }
        ParserKind::Streaming => {
            let mut parser = StreamingParser::open(path)?.with_chunk_size(chunk_size);
            if let Some(token) = cancel {
                parser = parser.with_cancel(token);
            }
            parser.parse()
        }
    }
}
