//! Draw commands recovered from frame blocks.

use serde::Serialize;

/// A 1-indexed pixel coordinate; the top-left of the grid is `(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Pixel {
    pub x: u32,
    pub y: u32,
}

impl Pixel {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// One colour block scoped to an inclusive frame range.
///
/// `color` is the verbatim token from the source text (`rgba(...)`,
/// `rgb(...)` or `#RRGGBB`); use [`Colour::from_token`] to decode it.
///
/// [`Colour::from_token`]: crate::types::Colour::from_token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub frame_start: u32,
    pub frame_end: u32,
    pub color: String,
    pub pixels: Vec<Pixel>,
}

impl Command {
    /// Build a command, ordering the frame range so `frame_start <= frame_end`.
    pub fn new(frame_a: u32, frame_b: u32, color: impl Into<String>, pixels: Vec<Pixel>) -> Self {
        Self {
            frame_start: frame_a.min(frame_b),
            frame_end: frame_a.max(frame_b),
            color: color.into(),
            pixels,
        }
    }

    /// Whether this command draws on the given frame index.
    pub fn applies_to(&self, frame: u32) -> bool {
        (self.frame_start..=self.frame_end).contains(&frame)
    }
}
