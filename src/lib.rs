//! hmic - HMIC pixel-animation codec
//!
//! HMIC is a plain-text format for frame-based pixel animation: an
//! `info{...}` header followed by frame blocks of colour-grouped pixel
//! runs. HMIC7 is the same text compressed with zstd.
//!
//! The library encodes images, GIFs and image sequences to HMIC, parses
//! HMIC back into draw commands (whole-file or streaming), renders frames
//! to PNG and validates documents.

pub mod cli;
pub mod config;
pub mod container;
pub mod encode;
pub mod error;
pub mod media;
pub mod output;
pub mod parser;
pub mod render;
pub mod types;
pub mod validation;

pub use config::Config;
pub use container::{Container, Sink, Source};
pub use encode::{
    encode_frame, encode_media, encode_to_file, EncodeSummary, EncodedFrame, FrameWriter,
    PixelGrid, PixelRun, ProgressEvent,
};
pub use error::{HmicError, Result};
pub use media::{MediaOptions, MediaSource};
pub use parser::{parse_file, CancelToken, ParserKind, StreamingParser, WholeFileParser};
pub use render::{write_png, FrameRenderer, RenderedFrame};
pub use types::{Colour, Command, Document, Header, Pixel, StreamInfo};
pub use validation::{validate_document, Diagnostic, Severity, ValidationResult};
