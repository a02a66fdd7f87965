//! Whole-file parser: one owned buffer, every token available at once.

use std::path::Path;

use tracing::debug;

use super::cancel::{check, CancelToken};
use super::grammar::{parse_frame_body, parse_header_body, scan_frame_open, scan_header_open, Scan};
use super::window::find_matching_brace;
use crate::container::Source;
use crate::error::Result;
use crate::types::{Command, Document, Header};

/// Parses an HMIC file held entirely in memory.
///
/// The buffer is immutable for the parser's lifetime, so [`parse`] can be
/// called repeatedly and always returns the same document.
///
/// [`parse`]: WholeFileParser::parse
#[derive(Debug, Clone)]
pub struct WholeFileParser {
    content: Vec<u8>,
    cancel: Option<CancelToken>,
}

impl WholeFileParser {
    /// Read the complete file (HMIC or HMIC7) into memory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_source(&Source::open(path)?)
    }

    pub fn from_source(source: &Source) -> Result<Self> {
        Ok(Self::from_bytes(source.read_all()?))
    }

    /// Parse plain HMIC text already in memory.
    pub fn from_bytes(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            cancel: None,
        }
    }

    /// Check `token` once per scan step and stop with `Cancelled` when set.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn parse(&self) -> Result<Document> {
        let header = self.parse_header()?;
        let commands = self.parse_frames()?;
        debug!(
            keys = header.len(),
            commands = commands.len(),
            bytes = self.content.len(),
            "whole-file parse complete"
        );
        Ok(Document::new(header, commands))
    }

    /// First `info{...}` whose braces balance; empty when there is none.
    fn parse_header(&self) -> Result<Header> {
        let data = self.content.as_slice();
        let mut header = Header::new();
        let mut pos = 0;

        while pos < data.len() {
            check(self.cancel.as_ref())?;
            match scan_header_open(data, pos) {
                Scan::Found { next, .. } => match find_matching_brace(data, next - 1) {
                    Some(close) => {
                        parse_header_body(&data[next..close], &mut header);
                        break;
                    }
                    None => pos += 1,
                },
                Scan::Skip { next } => pos = next,
                Scan::Partial => pos += 1,
            }
        }

        Ok(header)
    }

    /// Every balanced frame block, in order of appearance.
    fn parse_frames(&self) -> Result<Vec<Command>> {
        let data = self.content.as_slice();
        let mut commands = Vec::new();
        let mut frames = 0usize;
        let mut pos = 0;

        while pos < data.len() {
            check(self.cancel.as_ref())?;
            match scan_frame_open(data, pos) {
                Scan::Found { value: range, next } => match find_matching_brace(data, next - 1) {
                    Some(close) => {
                        parse_frame_body(&data[next..close], range, &mut commands);
                        frames += 1;
                        pos = close + 1;
                    }
                    None => {
                        debug!(start = range.start, end = range.end, "frame never closes");
                        pos += 1;
                    }
                },
                Scan::Skip { next } => pos = next,
                Scan::Partial => pos += 1,
            }
        }

        debug!(frames, "frames scanned");
        Ok(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HmicError;
    use crate::types::Pixel;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = "info{\nDISPLAY=3X1\nFPS=1\nF=2\nLOOP=N\n}\n\n\
F1{\n  rgba(0,0,255,255){\n    P=3x1\n  }\n  rgba(255,0,0,255){\n    PL=1x1-2x1\n  }\n}\n\
F2{\n  #00FF00{\n    PL=1x1-3x1\n  }\n}\n";

    #[test]
    fn test_parse_sample() {
        let doc = WholeFileParser::from_bytes(SAMPLE).parse().unwrap();

        assert_eq!(doc.header.display(), Some((3, 1)));
        assert_eq!(doc.header.frame_count(), Some(2));
        assert_eq!(
            doc.commands,
            vec![
                Command::new(1, 1, "rgba(0,0,255,255)", vec![Pixel::new(3, 1)]),
                Command::new(
                    1,
                    1,
                    "rgba(255,0,0,255)",
                    vec![Pixel::new(1, 1), Pixel::new(2, 1)]
                ),
                Command::new(
                    2,
                    2,
                    "#00FF00",
                    vec![Pixel::new(1, 1), Pixel::new(2, 1), Pixel::new(3, 1)]
                ),
            ]
        );
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = WholeFileParser::from_bytes(SAMPLE);
        assert_eq!(parser.parse().unwrap(), parser.parse().unwrap());
    }

    #[test]
    fn test_header_only_first_block() {
        let doc = WholeFileParser::from_bytes("info{FPS=1\n}\nINFO {\nFPS=2\n}")
            .parse()
            .unwrap();
        assert_eq!(doc.header.fps(), Some(1));
    }

    #[test]
    fn test_header_skips_unopened_info() {
        let doc = WholeFileParser::from_bytes("information\ninfo {\nLOOP=Y\n}")
            .parse()
            .unwrap();
        assert_eq!(doc.header.looping(), Some(true));
    }

    #[test]
    fn test_no_header_no_frames() {
        let doc = WholeFileParser::from_bytes("nothing to see").parse().unwrap();
        assert!(doc.header.is_empty());
        assert!(doc.commands.is_empty());

        let doc = WholeFileParser::from_bytes("").parse().unwrap();
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn test_frame_range() {
        let doc = WholeFileParser::from_bytes("f1-10 {#FFFFFF{P=1x1}}")
            .parse()
            .unwrap();
        assert_eq!(doc.commands.len(), 1);
        assert_eq!(doc.commands[0].frame_start, 1);
        assert_eq!(doc.commands[0].frame_end, 10);
    }

    #[test]
    fn test_unclosed_frame_keeps_earlier_frames() {
        let text = "F1{\n#FFFFFF{\nP=1x1\n}\n}\nF2{\n#000000{\nP=2x2\n}\n";
        let doc = WholeFileParser::from_bytes(text).parse().unwrap();
        assert_eq!(
            doc.commands,
            vec![Command::new(1, 1, "#FFFFFF", vec![Pixel::new(1, 1)])]
        );
    }

    #[test]
    fn test_marker_without_brace_is_ignored() {
        let doc = WholeFileParser::from_bytes("F1 oops F2{#FFFFFF{P=1x1}}")
            .parse()
            .unwrap();
        assert_eq!(doc.commands.len(), 1);
        assert_eq!(doc.commands[0].frame_start, 2);
    }

    #[test]
    fn test_open_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.hmic");
        fs::write(&path, SAMPLE).unwrap();

        let parser = WholeFileParser::open(&path).unwrap();
        assert_eq!(parser.len(), SAMPLE.len());
        assert_eq!(parser.parse().unwrap().commands.len(), 3);
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(WholeFileParser::open(dir.path().join("nope.hmic")).is_err());
    }

    #[test]
    fn test_cancelled_parse() {
        let token = CancelToken::new();
        token.cancel();
        let result = WholeFileParser::from_bytes(SAMPLE).with_cancel(token).parse();
        assert!(matches!(result, Err(HmicError::Cancelled)));
    }
}
