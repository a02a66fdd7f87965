//! Scanline run-length encoding of one frame.

use std::collections::BTreeMap;
use std::fmt;

use super::grid::PixelGrid;
use crate::types::Colour;

/// One pixel command, 1-indexed like the text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelRun {
    /// A single pixel: `P=<x>x<y>`.
    Point { x: u32, y: u32 },
    /// A horizontal run from `x1` to `x2` inclusive: `PL=<x1>x<y>-<x2>x<y>`.
    Line { x1: u32, x2: u32, y: u32 },
}

impl PixelRun {
    /// Number of pixels covered.
    pub fn pixel_count(&self) -> u32 {
        match *self {
            PixelRun::Point { .. } => 1,
            PixelRun::Line { x1, x2, .. } => x2 - x1 + 1,
        }
    }
}

impl fmt::Display for PixelRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PixelRun::Point { x, y } => write!(f, "P={}x{}", x, y),
            PixelRun::Line { x1, x2, y } => write!(f, "PL={}x{}-{}x{}", x1, y, x2, y),
        }
    }
}

/// A frame's runs grouped by exact colour, ascending `(r, g, b, a)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrame {
    pub index: u32,
    pub runs: BTreeMap<Colour, Vec<PixelRun>>,
}

impl EncodedFrame {
    /// Total pixels covered by all runs.
    pub fn pixel_count(&self) -> u64 {
        self.runs
            .values()
            .flatten()
            .map(|run| u64::from(run.pixel_count()))
            .sum()
    }
}

/// Encode `grid` as frame `index`.
///
/// Each row is scanned left to right; a run of one pixel becomes a point,
/// a longer run of identical RGBA values becomes a line. Every pixel lands
/// in exactly one run.
pub fn encode_frame(grid: &PixelGrid, index: u32) -> EncodedFrame {
    let mut runs: BTreeMap<Colour, Vec<PixelRun>> = BTreeMap::new();

    for (row, y) in grid.rows().zip(1u32..) {
        let mut x = 0usize;
        while x < row.len() {
            let colour = row[x];
            let run = row[x..].iter().take_while(|&&c| c == colour).count();
            let x1 = x as u32 + 1;
            let cmd = if run == 1 {
                PixelRun::Point { x: x1, y }
            } else {
                PixelRun::Line {
                    x1,
                    x2: (x + run) as u32,
                    y,
                }
            };
            runs.entry(colour).or_default().push(cmd);
            x += run;
        }
    }

    EncodedFrame { index, runs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED: Colour = Colour::rgb(255, 0, 0);
    const BLUE: Colour = Colour::rgb(0, 0, 255);

    #[test]
    fn test_red_red_blue() {
        let grid = PixelGrid::new(3, 1, vec![RED, RED, BLUE]).unwrap();
        let frame = encode_frame(&grid, 1);

        assert_eq!(frame.runs[&RED], vec![PixelRun::Line { x1: 1, x2: 2, y: 1 }]);
        assert_eq!(frame.runs[&BLUE], vec![PixelRun::Point { x: 3, y: 1 }]);
        assert_eq!(frame.runs[&RED][0].to_string(), "PL=1x1-2x1");
        assert_eq!(frame.runs[&BLUE][0].to_string(), "P=3x1");
    }

    #[test]
    fn test_colours_ascending() {
        let grid = PixelGrid::new(3, 1, vec![RED, Colour::TRANSPARENT, BLUE]).unwrap();
        let frame = encode_frame(&grid, 1);

        let order: Vec<Colour> = frame.runs.keys().copied().collect();
        assert_eq!(order, vec![Colour::TRANSPARENT, BLUE, RED]);
    }

    #[test]
    fn test_alpha_distinguishes_runs() {
        let faded = Colour::new(255, 0, 0, 128);
        let grid = PixelGrid::new(2, 1, vec![RED, faded]).unwrap();
        let frame = encode_frame(&grid, 1);

        assert_eq!(frame.runs.len(), 2);
    }

    #[test]
    fn test_runs_restart_each_row() {
        let grid = PixelGrid::filled(2, 2, RED).unwrap();
        let frame = encode_frame(&grid, 4);

        assert_eq!(frame.index, 4);
        assert_eq!(
            frame.runs[&RED],
            vec![
                PixelRun::Line { x1: 1, x2: 2, y: 1 },
                PixelRun::Line { x1: 1, x2: 2, y: 2 },
            ]
        );
    }

    #[test]
    fn test_every_pixel_covered_once() {
        let pixels = vec![RED, BLUE, BLUE, RED, RED, RED, BLUE, RED, BLUE, BLUE, RED, BLUE];
        let grid = PixelGrid::new(4, 3, pixels).unwrap();
        let frame = encode_frame(&grid, 1);

        assert_eq!(frame.pixel_count(), 12);
    }
}
