//! Frame compositing - replays a document's commands onto a canvas.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::MAX_PIXELS;
use crate::error::{HmicError, Result};
use crate::types::{Colour, Document};

/// One composited frame - a grid of colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    /// Frame index (1-based).
    pub index: u32,

    /// Pixel grid (row-major: pixels[y][x], zero-based).
    pixels: Vec<Vec<Colour>>,

    width: usize,
    height: usize,
}

impl RenderedFrame {
    pub fn new(index: u32, pixels: Vec<Vec<Colour>>) -> Self {
        let height = pixels.len();
        let width = pixels.first().map_or(0, |row| row.len());

        Self {
            index,
            pixels,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Zero-based lookup.
    pub fn get(&self, x: usize, y: usize) -> Option<Colour> {
        self.pixels.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn pixels(&self) -> &[Vec<Colour>] {
        &self.pixels
    }

    /// Flat RGBA buffer.
    pub fn to_rgba_buffer(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.width * self.height * 4);
        for row in &self.pixels {
            for colour in row {
                buffer.extend_from_slice(&colour.to_rgba());
            }
        }
        buffer
    }
}

/// Composites frames of a parsed document.
///
/// The canvas size comes from the header's `DISPLAY`; without one, the
/// smallest canvas holding every referenced pixel is used. Commands apply
/// in document order, so later commands paint over earlier ones. Pixels
/// outside the canvas are ignored and colours that fail to decode are
/// painted [`Colour::MAGENTA`].
pub struct FrameRenderer<'a> {
    document: &'a Document,
    width: u32,
    height: u32,
    colours: HashMap<&'a str, Colour>,
}

impl<'a> FrameRenderer<'a> {
    pub fn new(document: &'a Document) -> Result<Self> {
        let (width, height) = match document.header.display() {
            Some(size) => size,
            None => {
                let extent = document
                    .commands
                    .iter()
                    .flat_map(|c| c.pixels.iter())
                    .fold((0, 0), |(w, h), p| (w.max(p.x), h.max(p.y)));
                debug!(width = extent.0, height = extent.1, "no DISPLAY, using pixel extent");
                extent
            }
        };

        if width == 0 || height == 0 {
            return Err(HmicError::Validation {
                message: "Nothing to render: canvas size is zero".to_string(),
                help: Some("Add DISPLAY=<W>X<H> to the info block".to_string()),
            });
        }
        if u64::from(width) * u64::from(height) > MAX_PIXELS {
            return Err(HmicError::Validation {
                message: format!("Canvas {}x{} is too large to render", width, height),
                help: Some(format!("Rendering is limited to {} pixels per frame", MAX_PIXELS)),
            });
        }

        let mut colours = HashMap::new();
        for command in &document.commands {
            let token = command.color.as_str();
            colours.entry(token).or_insert_with(|| {
                Colour::from_token(token).unwrap_or_else(|| {
                    warn!(token, "undecodable colour, painting magenta");
                    Colour::MAGENTA
                })
            });
        }

        Ok(Self {
            document,
            width,
            height,
            colours,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Composite frame `index`.
    pub fn render(&self, index: u32) -> RenderedFrame {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut pixels = vec![vec![Colour::TRANSPARENT; w]; h];

        for command in self.document.commands_for_frame(index) {
            let colour = self
                .colours
                .get(command.color.as_str())
                .copied()
                .unwrap_or(Colour::MAGENTA);
            for p in &command.pixels {
                if p.x == 0 || p.y == 0 || p.x > self.width || p.y > self.height {
                    continue;
                }
                pixels[(p.y - 1) as usize][(p.x - 1) as usize] = colour;
            }
        }

        RenderedFrame::new(index, pixels)
    }

    /// Frames `1..=frame_count`, composited lazily.
    pub fn render_all(&self) -> impl Iterator<Item = RenderedFrame> + '_ {
        (1..=self.document.frame_count()).map(move |i| self.render(i))
    }
}
