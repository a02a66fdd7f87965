//! Media in, HMIC text out.

use std::io::Write;
use std::path::Path;
use std::sync::mpsc::Sender;

use tracing::{debug, warn};

use super::progress::{post, ProgressEvent};
use super::runs::encode_frame;
use super::writer::FrameWriter;
use crate::container::{Container, Sink};
use crate::error::{HmicError, Result};
use crate::media::MediaSource;
use crate::types::Header;

/// What an encode produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeSummary {
    pub frames: u32,
    pub runs: usize,
}

/// Encode every frame of `source` into `out`.
///
/// The header is written first from the source's stream info, then each
/// frame is decoded, run-length encoded, written and dropped before the
/// next is decoded. Frames are numbered from 1. A frame whose size differs
/// from the header's DISPLAY is an error.
pub fn encode_media<W: Write>(
    source: &MediaSource,
    out: W,
    progress: Option<&Sender<ProgressEvent>>,
) -> Result<EncodeSummary> {
    let info = source.info();
    let header = Header::from(info);
    let mut writer = FrameWriter::new(out);
    writer.write_header(&header)?;

    post(progress, ProgressEvent::Started { total: info.frames });

    let mut summary = EncodeSummary::default();
    for (grid, index) in source.frames()?.zip(1u32..) {
        let grid = grid?;
        if grid.size() != (info.width, info.height) {
            return Err(HmicError::Encode {
                message: format!(
                    "Frame {} is {}x{}, expected {}x{}",
                    index,
                    grid.width(),
                    grid.height(),
                    info.width,
                    info.height
                ),
                help: Some("Every frame of an input must have the same size".to_string()),
            });
        }

        let frame = encode_frame(&grid, index);
        drop(grid);
        summary.runs += frame.runs.values().map(Vec::len).sum::<usize>();
        writer.write_frame(&frame)?;
        summary.frames = index;

        post(progress, ProgressEvent::Frame { index });
    }

    writer.get_mut().flush()?;
    post(progress, ProgressEvent::Finished { frames: summary.frames });
    debug!(frames = summary.frames, runs = summary.runs, "encode complete");
    Ok(summary)
}

/// Encode `source` into a new file at `output`.
///
/// On failure the partly written file is removed.
pub fn encode_to_file(
    source: &MediaSource,
    output: &Path,
    container: Container,
    level: i32,
    progress: Option<&Sender<ProgressEvent>>,
) -> Result<EncodeSummary> {
    let mut sink = Sink::create(output, container, level)?;
    let result = encode_media(source, &mut sink, progress).and_then(|summary| {
        sink.finish()
            .map_err(|e| HmicError::io(output, "Failed to finish writing", e))?;
        Ok(summary)
    });

    if result.is_err() {
        if let Err(e) = std::fs::remove_file(output) {
            warn!(path = %output.display(), error = %e, "could not remove partial output");
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::progress::channel;
    use crate::media::MediaOptions;
    use crate::parser::{StreamingParser, WholeFileParser};
    use crate::types::Pixel;
    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn red_red_blue(path: &Path) {
        let mut img = RgbaImage::from_pixel(3, 1, Rgba([255, 0, 0, 255]));
        img.put_pixel(2, 0, Rgba([0, 0, 255, 255]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_encode_still_to_text() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("rrb.png");
        red_red_blue(&input);

        let source = MediaSource::open(&input, MediaOptions::default()).unwrap();
        let mut out = Vec::new();
        let summary = encode_media(&source, &mut out, None).unwrap();

        assert_eq!(summary, EncodeSummary { frames: 1, runs: 2 });
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "info{\nDISPLAY=3X1\nFPS=1\nF=1\nLOOP=Y\n}\n\n\
F1{\nrgba(0,0,255,255){\nP=3x1\n}\nrgba(255,0,0,255){\nPL=1x1-2x1\n}\n}\n"
        );
    }

    #[test]
    fn test_progress_events() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("rrb.png");
        red_red_blue(&input);

        let source = MediaSource::open(&input, MediaOptions::default()).unwrap();
        let (tx, rx) = channel();
        encode_media(&source, Vec::new(), Some(&tx)).unwrap();
        drop(tx);

        assert_eq!(
            rx.iter().collect::<Vec<_>>(),
            vec![
                ProgressEvent::Started { total: 1 },
                ProgressEvent::Frame { index: 1 },
                ProgressEvent::Finished { frames: 1 },
            ]
        );
    }

    #[test]
    fn test_mismatched_frame_size_fails() {
        let dir = tempdir().unwrap();
        RgbaImage::new(2, 2).save(dir.path().join("a.png")).unwrap();
        RgbaImage::new(3, 2).save(dir.path().join("b.png")).unwrap();

        let source = MediaSource::open(dir.path(), MediaOptions::default()).unwrap();
        let result = encode_media(&source, Vec::new(), None);
        assert!(matches!(result, Err(HmicError::Encode { .. })));
    }

    #[test]
    fn test_failed_encode_leaves_no_output() {
        let dir = tempdir().unwrap();
        let frames = dir.path().join("frames");
        std::fs::create_dir(&frames).unwrap();
        RgbaImage::new(2, 2).save(frames.join("a.png")).unwrap();
        RgbaImage::new(3, 2).save(frames.join("b.png")).unwrap();

        let source = MediaSource::open(&frames, MediaOptions::default()).unwrap();
        for (container, name) in [(Container::Hmic, "out.hmic"), (Container::Hmic7, "out.hmic7")] {
            let output = dir.path().join(name);
            let result = encode_to_file(&source, &output, container, 3, None);
            assert!(matches!(result, Err(HmicError::Encode { .. })));
            assert!(!output.exists());
        }
    }

    #[test]
    fn test_encode_to_hmic7_parses_back() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("rrb.png");
        let output = dir.path().join("rrb.hmic7");
        red_red_blue(&input);

        let source = MediaSource::open(&input, MediaOptions::default()).unwrap();
        encode_to_file(&source, &output, Container::Hmic7, 3, None).unwrap();

        let whole = WholeFileParser::open(&output).unwrap().parse().unwrap();
        let streamed = StreamingParser::open(&output)
            .unwrap()
            .with_chunk_size(7)
            .parse()
            .unwrap();
        assert_eq!(whole, streamed);
        assert_eq!(whole.header.display(), Some((3, 1)));
        assert_eq!(whole.commands[1].pixels, vec![Pixel::new(1, 1), Pixel::new(2, 1)]);
    }
}
