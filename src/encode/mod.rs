//! Encoding: pixel grids to HMIC text.
//!
//! [`encode_frame`] turns one [`PixelGrid`] into colour-grouped runs,
//! [`FrameWriter`] serializes header and frames, and [`encode_media`] drives
//! both over a [`MediaSource`](crate::media::MediaSource) while posting
//! [`ProgressEvent`]s.

mod grid;
mod pipeline;
pub mod progress;
mod runs;
mod writer;

pub use grid::PixelGrid;
pub use pipeline::{encode_media, encode_to_file, EncodeSummary};
pub use progress::ProgressEvent;
pub use runs::{encode_frame, EncodedFrame, PixelRun};
pub use writer::{format_frame, format_header, FrameWriter};
