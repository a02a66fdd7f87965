//! HMIC grammar as pure functions over byte windows.
//!
//! Nothing here knows how the bytes arrived. The whole-file parser hands
//! these functions its entire buffer; the streaming parser hands them its
//! carry-over window and, once a block's closing brace has been seen, the
//! complete block body.
//!
//! Every scan function returns a [`Scan`]: either a match plus the index
//! just past it, a no-match plus a resume index strictly greater than the
//! start position, or `Partial` when the window ended before a decision
//! could be made. Driving loops therefore always make progress.

use tracing::{trace, warn};

use super::window::{
    find_matching_brace, partial_match_ci, prefix_match_ci, skip_whitespace, take_leading_int,
    trim, trimmed_lines,
};
use crate::types::{Command, Header, Pixel};

const INFO: &[u8] = b"info";
const RGBA: &[u8] = b"rgba(";
const RGB: &[u8] = b"rgb(";

/// Most pixels a single `PL=` line may expand to. Longer lines are
/// dropped like diagonals.
pub const MAX_LINE_PIXELS: u32 = 1 << 20;

/// Outcome of one scan attempt at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan<T> {
    /// Matched; `next` is the index just past the match.
    Found { value: T, next: usize },
    /// No match here; resume at `next`.
    Skip { next: usize },
    /// The window ended before the attempt could be decided.
    Partial,
}

/// Inclusive frame range from a `F<start>[-<end>]` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub start: u32,
    pub end: u32,
}

/// Try to match `info` WS? `{` at `pos`. `next` is the index after `{`.
pub fn scan_header_open(window: &[u8], pos: usize) -> Scan<()> {
    let rest = &window[pos..];
    if prefix_match_ci(rest, INFO) {
        let open = skip_whitespace(window, pos + INFO.len());
        return match window.get(open) {
            None => Scan::Partial,
            Some(b'{') => Scan::Found {
                value: (),
                next: open + 1,
            },
            Some(_) => Scan::Skip { next: pos + 1 },
        };
    }
    if !rest.is_empty() && partial_match_ci(rest, INFO) {
        return Scan::Partial;
    }
    Scan::Skip { next: pos + 1 }
}

/// Try to match `F|f` INT (`-` INT)? WS? `{` at `pos`.
///
/// A `-` with no digits after it leaves the range as a single frame.
/// `next` is the index after `{`.
pub fn scan_frame_open(window: &[u8], pos: usize) -> Scan<FrameRange> {
    let skip = Scan::Skip { next: pos + 1 };
    if !matches!(window.get(pos), Some(b'F' | b'f')) {
        return skip;
    }
    let Some((start, mut cursor)) = take_leading_int(window, pos + 1) else {
        return if pos + 1 >= window.len() {
            Scan::Partial
        } else {
            skip
        };
    };

    let mut end = start;
    match window.get(cursor) {
        None => return Scan::Partial,
        Some(b'-') => {
            cursor += 1;
            if cursor >= window.len() {
                return Scan::Partial;
            }
            if let Some((value, after)) = take_leading_int(window, cursor) {
                end = value;
                cursor = after;
            }
        }
        Some(_) => {}
    }

    let open = skip_whitespace(window, cursor);
    match window.get(open) {
        None => Scan::Partial,
        Some(b'{') => Scan::Found {
            value: FrameRange { start, end },
            next: open + 1,
        },
        Some(_) => skip,
    }
}

/// Try to match a colour token at `pos`: `rgba(...)`, `rgb(...)` or
/// `#` followed by six hex digits. The token is returned verbatim.
///
/// Intended for complete block bodies, so it never reports `Partial`.
pub fn scan_color(body: &[u8], pos: usize) -> Scan<&[u8]> {
    let skip = Scan::Skip { next: pos + 1 };
    let rest = &body[pos..];

    let prefix = if prefix_match_ci(rest, RGBA) {
        RGBA.len()
    } else if prefix_match_ci(rest, RGB) {
        RGB.len()
    } else if rest.first() == Some(&b'#') {
        return match rest.get(1..7) {
            Some(hex) if hex.iter().all(u8::is_ascii_hexdigit) => Scan::Found {
                value: &rest[..7],
                next: pos + 7,
            },
            _ => skip,
        };
    } else {
        return skip;
    };

    match rest[prefix..].iter().position(|&b| b == b')') {
        Some(offset) => {
            let close = prefix + offset;
            Scan::Found {
                value: &rest[..=close],
                next: pos + close + 1,
            }
        }
        None => skip,
    }
}

/// Parse the interior of `info{...}` into `header`.
///
/// Each line is split at its first `=`; lines without one, or with an
/// empty key or value after trimming, are ignored. Keys are uppercased and
/// later duplicates overwrite earlier ones.
pub fn parse_header_body(body: &[u8], header: &mut Header) {
    for line in trimmed_lines(body) {
        let Some(eq) = line.iter().position(|&b| b == b'=') else {
            continue;
        };
        let key = trim(&line[..eq]);
        let value = trim(&line[eq + 1..]);
        if key.is_empty() || value.is_empty() {
            continue;
        }
        header.insert(
            String::from_utf8_lossy(key),
            String::from_utf8_lossy(value).into_owned(),
        );
    }
}

/// Parse the interior of a frame block, appending one command per colour
/// block that yields at least one pixel.
///
/// Anything that does not form `colour WS? { ... }` is stepped over one
/// byte at a time.
pub fn parse_frame_body(body: &[u8], range: FrameRange, commands: &mut Vec<Command>) {
    let mut pos = 0;
    while pos < body.len() {
        let (token, after) = match scan_color(body, pos) {
            Scan::Found { value, next } => (value, next),
            Scan::Skip { next } => {
                pos = next;
                continue;
            }
            Scan::Partial => {
                pos += 1;
                continue;
            }
        };

        let open = skip_whitespace(body, after);
        if body.get(open) != Some(&b'{') {
            pos += 1;
            continue;
        }
        let Some(close) = find_matching_brace(body, open) else {
            pos += 1;
            continue;
        };

        let pixels = parse_pixel_list(&body[open + 1..close]);
        trace!(
            color = %String::from_utf8_lossy(token),
            pixels = pixels.len(),
            "colour block"
        );
        if !pixels.is_empty() {
            commands.push(Command::new(
                range.start,
                range.end,
                String::from_utf8_lossy(token),
                pixels,
            ));
        }
        pos = close + 1;
    }
}

/// Parse the `P=` / `PL=` lines of a colour block.
///
/// Lines matching neither prefix are ignored.
pub fn parse_pixel_list(body: &[u8]) -> Vec<Pixel> {
    let mut pixels = Vec::new();
    for line in trimmed_lines(body) {
        if line.len() > 3 && prefix_match_ci(line, b"pl=") {
            LineEnds::parse(&line[3..]).expand_into(&mut pixels);
        } else if line.len() > 2 && prefix_match_ci(line, b"p=") {
            parse_points(&line[2..], &mut pixels);
        }
    }
    pixels
}

/// Parse `<int>x<int>` pairs separated by commas (or whitespace).
///
/// Pairs missing either coordinate are dropped; unexpected bytes are
/// stepped over.
fn parse_points(list: &[u8], pixels: &mut Vec<Pixel>) {
    let mut pos = 0;
    while pos < list.len() {
        let started = pos;

        let x = take_leading_int(list, pos);
        if let Some((_, after)) = x {
            pos = after;
        }
        let mut y = None;
        if matches!(list.get(pos), Some(b'x' | b'X')) {
            y = take_leading_int(list, pos + 1);
            pos = y.map_or(pos + 1, |(_, after)| after);
        }
        if let (Some((x, _)), Some((y, _))) = (x, y) {
            pixels.push(Pixel::new(x, y));
        }

        if list.get(pos) == Some(&b',') {
            pos += 1;
        }
        pos = skip_whitespace(list, pos);
        if pos == started {
            pos += 1;
        }
    }
}

/// Which endpoint coordinate digits are currently accumulating into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    X1,
    Y1,
    X2,
    Y2,
}

/// Endpoints of a `PL=x1 x y1 - x2 x y2` line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LineEnds {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
}

impl LineEnds {
    /// `x`/`X` moves from an x to its y, `-` jumps to the second point,
    /// digits accumulate, every other byte is ignored.
    fn parse(spec: &[u8]) -> Self {
        let mut ends = LineEnds::default();
        let mut cursor = Cursor::X1;
        for &b in spec {
            match b {
                b'0'..=b'9' => {
                    let slot = ends.slot(cursor);
                    *slot = slot.saturating_mul(10).saturating_add(u32::from(b - b'0'));
                }
                b'x' | b'X' => {
                    cursor = match cursor {
                        Cursor::X1 => Cursor::Y1,
                        Cursor::X2 => Cursor::Y2,
                        other => other,
                    }
                }
                b'-' => cursor = Cursor::X2,
                _ => {}
            }
        }
        ends
    }

    fn slot(&mut self, cursor: Cursor) -> &mut u32 {
        match cursor {
            Cursor::X1 => &mut self.x1,
            Cursor::Y1 => &mut self.y1,
            Cursor::X2 => &mut self.x2,
            Cursor::Y2 => &mut self.y2,
        }
    }

    /// Horizontal and vertical lines expand inclusively; diagonals and
    /// lines longer than [`MAX_LINE_PIXELS`] expand to nothing.
    fn expand_into(self, pixels: &mut Vec<Pixel>) {
        let span = self.x1.abs_diff(self.x2).max(self.y1.abs_diff(self.y2));
        if span >= MAX_LINE_PIXELS {
            warn!(?self, "line too long, dropped");
            return;
        }
        if self.y1 == self.y2 {
            let (lo, hi) = (self.x1.min(self.x2), self.x1.max(self.x2));
            pixels.extend((lo..=hi).map(|x| Pixel::new(x, self.y1)));
        } else if self.x1 == self.x2 {
            let (lo, hi) = (self.y1.min(self.y2), self.y1.max(self.y2));
            pixels.extend((lo..=hi).map(|y| Pixel::new(self.x1, y)));
        }
    }
}
