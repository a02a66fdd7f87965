//! Rendering: the consumer side of a parsed document.
//!
//! Composites frames from commands and writes them out as PNG.

mod frame;
mod png;

pub use frame::{FrameRenderer, RenderedFrame};
pub use png::{to_image, write_png};

/// Largest canvas or output image, in pixels, that rendering will allocate.
pub const MAX_PIXELS: u64 = 8192 * 8192;

