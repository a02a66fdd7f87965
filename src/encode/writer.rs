//! HMIC text serialization.
//!
//! ```text
//! info{
//! DISPLAY=3X1
//! FPS=1
//! }
//!
//! F1{
//! rgba(0,0,255,255){
//! P=3x1
//! }
//! }
//! ```

use std::fmt::Write as _;
use std::io::{self, Write};

use super::runs::EncodedFrame;
use crate::types::Header;

/// Header block, keys in canonical order, followed by a blank line.
pub fn format_header(header: &Header) -> String {
    let mut out = String::from("info{\n");
    for (key, value) in header.ordered() {
        let _ = writeln!(out, "{}={}", key, value);
    }
    out.push_str("}\n\n");
    out
}

/// One frame block, colours ascending.
pub fn format_frame(frame: &EncodedFrame) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "F{}{{", frame.index);
    for (colour, runs) in &frame.runs {
        let _ = writeln!(out, "{}{{", colour);
        for run in runs {
            let _ = writeln!(out, "{}", run);
        }
        out.push_str("}\n");
    }
    out.push_str("}\n");
    out
}

/// Writes a header and frames, in that order, to any byte sink.
#[derive(Debug)]
pub struct FrameWriter<W: Write> {
    inner: W,
    frames: u32,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, frames: 0 }
    }

    pub fn write_header(&mut self, header: &Header) -> io::Result<()> {
        self.inner.write_all(format_header(header).as_bytes())
    }

    pub fn write_frame(&mut self, frame: &EncodedFrame) -> io::Result<()> {
        self.inner.write_all(format_frame(frame).as_bytes())?;
        self.frames += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> u32 {
        self.frames
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode_frame, PixelGrid};
    use crate::parser::WholeFileParser;
    use crate::types::{Colour, Pixel, StreamInfo};
    use pretty_assertions::assert_eq;

    const RED: Colour = Colour::rgb(255, 0, 0);
    const BLUE: Colour = Colour::rgb(0, 0, 255);

    fn red_red_blue() -> EncodedFrame {
        encode_frame(&PixelGrid::new(3, 1, vec![RED, RED, BLUE]).unwrap(), 1)
    }

    #[test]
    fn test_format_frame() {
        insta::assert_snapshot!(format_frame(&red_red_blue()), @r###"
        F1{
        rgba(0,0,255,255){
        P=3x1
        }
        rgba(255,0,0,255){
        PL=1x1-2x1
        }
        }
        "###);
    }

    #[test]
    fn test_format_header_canonical_order() {
        let mut header = Header::from(StreamInfo {
            width: 64,
            height: 32,
            fps: 24,
            frames: 10,
            looping: true,
        });
        header.insert("author", "someone");

        assert_eq!(
            format_header(&header),
            "info{\nDISPLAY=64X32\nFPS=24\nF=10\nLOOP=Y\nAUTHOR=someone\n}\n\n"
        );
    }

    #[test]
    fn test_writer_output_parses_back() {
        let header = Header::from(StreamInfo {
            width: 3,
            height: 1,
            fps: 1,
            frames: 1,
            looping: false,
        });

        let mut writer = FrameWriter::new(Vec::new());
        writer.write_header(&header).unwrap();
        writer.write_frame(&red_red_blue()).unwrap();
        assert_eq!(writer.frames_written(), 1);

        let doc = WholeFileParser::from_bytes(writer.into_inner()).parse().unwrap();
        assert_eq!(doc.header, header);
        assert_eq!(doc.commands.len(), 2);
        assert_eq!(doc.commands[0].color, "rgba(0,0,255,255)");
        assert_eq!(doc.commands[0].pixels, vec![Pixel::new(3, 1)]);
        assert_eq!(doc.commands[1].color, "rgba(255,0,0,255)");
        assert_eq!(doc.commands[1].pixels, vec![Pixel::new(1, 1), Pixel::new(2, 1)]);
    }
}
