//! Validation checks for parsed documents.
//!
//! Each check takes a `&Document` and returns a `ValidationResult`.

use std::collections::{BTreeSet, HashSet};

use crate::types::header::{KEY_DISPLAY, KEY_FPS, KEY_FRAMES, KEY_LOOP};
use crate::types::{Colour, Document, Pixel};

use super::warning::{Diagnostic, ValidationResult};

pub const MISSING_HEADER: &str = "hmic::validate::missing-header";
pub const BAD_DISPLAY: &str = "hmic::validate::bad-display";
pub const BAD_FPS: &str = "hmic::validate::bad-fps";
pub const BAD_FRAME_COUNT: &str = "hmic::validate::bad-frame-count";
pub const BAD_LOOP: &str = "hmic::validate::bad-loop";
pub const NO_FRAMES: &str = "hmic::validate::no-frames";
pub const BAD_COLOUR: &str = "hmic::validate::bad-colour";
pub const OUT_OF_BOUNDS: &str = "hmic::validate::out-of-bounds";
pub const FRAME_RANGE: &str = "hmic::validate::frame-range";
pub const OVERLAP: &str = "hmic::validate::overlap";

/// Header presence and the recognized keys' formats.
pub fn check_header(doc: &Document) -> ValidationResult {
    let mut result = ValidationResult::new();
    let header = &doc.header;

    if header.is_empty() {
        result.push(
            Diagnostic::warning(MISSING_HEADER, "No info{...} header block")
                .with_help("Start the file with info{ DISPLAY=<W>X<H> ... }"),
        );
        return result;
    }

    if let Some(raw) = header.get(KEY_DISPLAY) {
        if !matches!(header.display(), Some((w, h)) if w > 0 && h > 0) {
            result.push(
                Diagnostic::error(BAD_DISPLAY, format!("DISPLAY '{}' is not <W>X<H>", raw))
                    .with_help("Use positive integers, e.g. DISPLAY=64X64"),
            );
        }
    }

    if let Some(raw) = header.get(KEY_FPS) {
        if !matches!(header.fps(), Some(fps) if fps > 0) {
            result.push(Diagnostic::error(
                BAD_FPS,
                format!("FPS '{}' is not a positive integer", raw),
            ));
        }
    }

    if let Some(raw) = header.get(KEY_FRAMES) {
        if header.frame_count().is_none() {
            result.push(Diagnostic::error(
                BAD_FRAME_COUNT,
                format!("F '{}' is not an integer", raw),
            ));
        }
    }

    if let Some(raw) = header.get(KEY_LOOP) {
        if header.looping().is_none() {
            result.push(
                Diagnostic::warning(BAD_LOOP, format!("LOOP '{}' is neither Y nor N", raw))
                    .with_help("Use LOOP=Y or LOOP=N"),
            );
        }
    }

    result
}

/// Frame presence and frame indices against `F`.
pub fn check_frames(doc: &Document) -> ValidationResult {
    let mut result = ValidationResult::new();

    if doc.commands.is_empty() {
        result.push(Diagnostic::warning(NO_FRAMES, "No frame blocks with pixels"));
        return result;
    }

    let declared = doc.header.frame_count();
    let mut reported = HashSet::new();
    for command in &doc.commands {
        if command.frame_start == 0 && reported.insert(0) {
            result.push(
                Diagnostic::warning(FRAME_RANGE, "Frame indices start at 1").at_frame(0),
            );
        }
        if let Some(total) = declared {
            if command.frame_end > total && reported.insert(command.frame_end) {
                result.push(
                    Diagnostic::warning(
                        FRAME_RANGE,
                        format!("Frame {} is beyond F={}", command.frame_end, total),
                    )
                    .at_frame(command.frame_end),
                );
            }
        }
    }

    result
}

/// Colour tokens that do not decode to RGBA.
pub fn check_colours(doc: &Document) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut seen = HashSet::new();

    for command in &doc.commands {
        let token = command.color.as_str();
        if Colour::from_token(token).is_none() && seen.insert(token) {
            result.push(
                Diagnostic::error(BAD_COLOUR, format!("Colour '{}' cannot be decoded", token))
                    .at_frame(command.frame_start)
                    .with_help("Use rgba(r,g,b,a), rgb(r,g,b) or #RRGGBB with channels 0-255"),
            );
        }
    }

    result
}

/// Pixels outside the DISPLAY area (1-based, inclusive).
pub fn check_bounds(doc: &Document) -> ValidationResult {
    let mut result = ValidationResult::new();
    let Some((width, height)) = doc.header.display() else {
        return result;
    };

    for command in &doc.commands {
        let outside: Vec<&Pixel> = command
            .pixels
            .iter()
            .filter(|p| p.x == 0 || p.y == 0 || p.x > width || p.y > height)
            .collect();
        if let Some(first) = outside.first() {
            result.push(
                Diagnostic::error(
                    OUT_OF_BOUNDS,
                    format!(
                        "{} pixel(s) of {} outside {}x{}, first at {}x{}",
                        outside.len(),
                        command.color,
                        width,
                        height,
                        first.x,
                        first.y
                    ),
                )
                .at_frame(command.frame_start),
            );
        }
    }

    result
}

/// Pixels drawn more than once within the same frame.
///
/// Frames between consecutive range boundaries share the same set of
/// commands, so one representative frame per span is checked.
pub fn check_overlaps(doc: &Document) -> ValidationResult {
    let mut result = ValidationResult::new();

    let mut bounds = BTreeSet::new();
    for command in &doc.commands {
        bounds.insert(command.frame_start);
        bounds.insert(command.frame_end.saturating_add(1));
    }

    for &frame in &bounds {
        let mut drawn = HashSet::new();
        let mut twice = 0usize;
        let mut first = None;
        for command in doc.commands_for_frame(frame) {
            for &p in &command.pixels {
                if !drawn.insert(p) {
                    twice += 1;
                    first.get_or_insert(p);
                }
            }
        }
        if let Some(p) = first {
            result.push(
                Diagnostic::warning(
                    OVERLAP,
                    format!("{} pixel(s) drawn more than once, first at {}x{}", twice, p.x, p.y),
                )
                .at_frame(frame),
            );
        }
    }

    result
}
