//! Core domain types for hmic.
//!
//! - `Colour` - RGBA colour values and colour-token decoding
//! - `Header` - the `info{...}` key/value block
//! - `Command` / `Pixel` - draw commands recovered from frame blocks
//! - `Document` - a parsed file (header + ordered commands)

mod colour;
mod command;
mod document;
pub mod header;

pub use colour::Colour;
pub use command::{Command, Pixel};
pub use document::Document;
pub use header::{Header, StreamInfo};
