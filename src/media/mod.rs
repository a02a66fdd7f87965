//! Media sources: the producer side of encoding.
//!
//! A [`MediaSource`] describes its stream up front ([`StreamInfo`]) and then
//! yields frames one [`PixelGrid`] at a time, so at most one decoded frame
//! is alive while the encoder runs.
//!
//! Supported inputs:
//! - a still image in any format `image` decodes (one frame)
//! - an animated GIF (frames composited by the decoder, LOOP from its
//!   NETSCAPE2.0 extension when present)
//! - a directory of still images, taken in file-name order

mod sequence;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageDecoder, ImageError};
use tracing::{debug, warn};

use crate::encode::PixelGrid;
use crate::error::{HmicError, Result};
use crate::types::StreamInfo;

pub use sequence::list_images;

/// Frame rate and loop settings applied where the input does not carry its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaOptions {
    /// Frame rate for image sequences.
    pub fps: u32,
    /// LOOP flag for sequences, and for GIFs without a loop extension.
    pub looping: bool,
}

impl Default for MediaOptions {
    fn default() -> Self {
        Self {
            fps: 24,
            looping: true,
        }
    }
}

/// What kind of input a source was opened from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    Still,
    Animation,
    Sequence(Vec<PathBuf>),
}

/// An opened input ready to yield frames.
#[derive(Debug, Clone)]
pub struct MediaSource {
    path: PathBuf,
    kind: MediaKind,
    info: StreamInfo,
}

/// Frames decoded one at a time.
pub type Frames<'a> = Box<dyn Iterator<Item = Result<PixelGrid>> + 'a>;

impl MediaSource {
    /// Inspect `path` and work out its stream parameters.
    ///
    /// GIFs are decoded once here to count frames; each frame is dropped
    /// as soon as it has been counted.
    pub fn open(path: impl AsRef<Path>, options: MediaOptions) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HmicError::Media {
                message: format!("Input not found: {}", path.display()),
                help: None,
            });
        }

        let (kind, info) = if path.is_dir() {
            open_sequence(path, options)?
        } else if is_gif(path) {
            (MediaKind::Animation, probe_gif(path, options)?)
        } else {
            let (width, height) =
                image::image_dimensions(path).map_err(|e| media_error(path, e))?;
            let info = StreamInfo {
                width,
                height,
                fps: 1,
                frames: 1,
                looping: true,
            };
            (MediaKind::Still, info)
        };

        debug!(
            path = %path.display(),
            width = info.width,
            height = info.height,
            fps = info.fps,
            frames = info.frames,
            "media opened"
        );

        Ok(Self {
            path: path.to_path_buf(),
            kind,
            info,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> &MediaKind {
        &self.kind
    }

    pub fn info(&self) -> StreamInfo {
        self.info
    }

    /// Decode frames in order, one at a time.
    pub fn frames(&self) -> Result<Frames<'_>> {
        match &self.kind {
            MediaKind::Still => Ok(Box::new(std::iter::once_with(|| load_grid(&self.path)))),
            MediaKind::Animation => {
                let decoder = open_gif(&self.path)?;
                let path = self.path.clone();
                Ok(Box::new(decoder.into_frames().map(move |frame| {
                    let frame = frame.map_err(|e| media_error(&path, e))?;
                    PixelGrid::try_from(frame.buffer())
                })))
            }
            MediaKind::Sequence(paths) => Ok(Box::new(paths.iter().map(|p| load_grid(p)))),
        }
    }
}

fn is_gif(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"))
}

fn open_gif(path: &Path) -> Result<GifDecoder<BufReader<File>>> {
    let file = File::open(path).map_err(|e| HmicError::io(path, "Failed to open", e))?;
    GifDecoder::new(BufReader::new(file)).map_err(|e| media_error(path, e))
}

/// Dimensions, frame count and frame rate of a GIF.
fn probe_gif(path: &Path, options: MediaOptions) -> Result<StreamInfo> {
    let decoder = open_gif(path)?;
    let (width, height) = decoder.dimensions();

    let mut frames = 0u32;
    let mut fps = None;
    for frame in decoder.into_frames() {
        let frame = frame.map_err(|e| media_error(path, e))?;
        if fps.is_none() {
            let (numer, denom) = frame.delay().numer_denom_ms();
            fps = Some(fps_from_delay(numer, denom));
        }
        frames += 1;
    }

    if frames == 0 {
        return Err(HmicError::Media {
            message: format!("{} contains no frames", path.display()),
            help: None,
        });
    }

    let looping = match read_gif_loop_count(path)? {
        Some(count) => count == 0,
        None => options.looping,
    };

    Ok(StreamInfo {
        width,
        height,
        fps: fps.unwrap_or(1),
        frames,
        looping,
    })
}

fn read_gif_loop_count(path: &Path) -> Result<Option<u16>> {
    let bytes = std::fs::read(path).map_err(|e| HmicError::io(path, "Failed to read", e))?;
    Ok(gif_loop_count(&bytes))
}

/// Repeat count from the NETSCAPE2.0 (or ANIMEXTS1.0) application
/// extension, `0` meaning forever. Only blocks before the first image are
/// looked at; `None` when the extension is absent or the stream is cut short.
pub fn gif_loop_count(bytes: &[u8]) -> Option<u16> {
    if bytes.len() < 13 || !bytes.starts_with(b"GIF") {
        return None;
    }
    let flags = bytes[10];
    let mut pos = 13;
    if flags & 0x80 != 0 {
        pos += 3 * (1usize << ((flags & 0x07) + 1));
    }

    loop {
        match *bytes.get(pos)? {
            0x21 => {
                let label = *bytes.get(pos + 1)?;
                pos += 2;
                let first = pos;
                if label == 0xFF {
                    let app = bytes.get(first + 1..first + 12)?;
                    let sub = bytes.get(first + 12..first + 16)?;
                    let known = app == b"NETSCAPE2.0" || app == b"ANIMEXTS1.0";
                    if known && sub[0] >= 3 && sub[1] == 1 {
                        return Some(u16::from_le_bytes([sub[2], sub[3]]));
                    }
                }
                pos = skip_sub_blocks(bytes, pos)?;
            }
            _ => return None,
        }
    }
}

/// Position just past a chain of data sub-blocks and its terminator.
fn skip_sub_blocks(bytes: &[u8], mut pos: usize) -> Option<usize> {
    loop {
        let len = *bytes.get(pos)? as usize;
        pos += 1;
        if len == 0 {
            return Some(pos);
        }
        pos += len;
    }
}

/// `max(1, 1000 / delay_ms)`; a zero delay plays at 1 FPS.
pub fn fps_from_delay(numer: u32, denom: u32) -> u32 {
    let denom = denom.max(1);
    let delay_ms = numer / denom;
    if delay_ms == 0 {
        warn!("frame delay is zero, using 1 FPS");
        return 1;
    }
    (1000 / delay_ms).max(1)
}

fn open_sequence(dir: &Path, options: MediaOptions) -> Result<(MediaKind, StreamInfo)> {
    let paths = list_images(dir);
    let Some(first) = paths.first() else {
        return Err(HmicError::Media {
            message: format!("No images found in {}", dir.display()),
            help: Some("Directory inputs use every image file directly inside it".to_string()),
        });
    };

    let (width, height) = image::image_dimensions(first).map_err(|e| media_error(first, e))?;
    let info = StreamInfo {
        width,
        height,
        fps: options.fps.max(1),
        frames: paths.len() as u32,
        looping: options.looping,
    };
    Ok((MediaKind::Sequence(paths), info))
}

fn load_grid(path: &Path) -> Result<PixelGrid> {
    let img = image::open(path).map_err(|e| media_error(path, e))?.to_rgba8();
    PixelGrid::try_from(&img)
}

fn media_error(path: &Path, err: ImageError) -> HmicError {
    HmicError::Media {
        message: format!("Failed to decode {}: {}", path.display(), err),
        help: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Colour;
    use image::codecs::gif::{GifEncoder, Repeat};
    use image::{Delay, Frame, Rgba, RgbaImage};
    use tempfile::tempdir;

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(rgba))
    }

    #[test]
    fn test_fps_from_delay() {
        assert_eq!(fps_from_delay(100, 1), 10);
        assert_eq!(fps_from_delay(40, 1), 25);
        assert_eq!(fps_from_delay(5000, 1), 1);
        assert_eq!(fps_from_delay(0, 1), 1);
        assert_eq!(fps_from_delay(200, 2), 10);
    }

    #[test]
    fn test_still_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("still.png");
        solid(4, 2, [10, 20, 30, 255]).save(&path).unwrap();

        let source = MediaSource::open(&path, MediaOptions::default()).unwrap();
        assert_eq!(source.kind(), &MediaKind::Still);
        assert_eq!(
            source.info(),
            StreamInfo {
                width: 4,
                height: 2,
                fps: 1,
                frames: 1,
                looping: true,
            }
        );

        let frames: Vec<PixelGrid> = source.frames().unwrap().map(|f| f.unwrap()).collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].get(3, 1), Some(Colour::rgb(10, 20, 30)));
    }

    #[test]
    fn test_animated_gif() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("anim.gif");
        {
            let file = File::create(&path).unwrap();
            let mut encoder = GifEncoder::new(file);
            let delay = Delay::from_numer_denom_ms(100, 1);
            encoder
                .encode_frames(vec![
                    Frame::from_parts(solid(2, 2, [255, 0, 0, 255]), 0, 0, delay),
                    Frame::from_parts(solid(2, 2, [0, 0, 255, 255]), 0, 0, delay),
                    Frame::from_parts(solid(2, 2, [0, 255, 0, 255]), 0, 0, delay),
                ])
                .unwrap();
        }

        let options = MediaOptions {
            fps: 24,
            looping: false,
        };
        let source = MediaSource::open(&path, options).unwrap();
        assert_eq!(source.kind(), &MediaKind::Animation);

        let info = source.info();
        assert_eq!((info.width, info.height), (2, 2));
        assert_eq!(info.frames, 3);
        assert_eq!(info.fps, 10);
        assert!(!info.looping);

        let frames: Vec<PixelGrid> = source.frames().unwrap().map(|f| f.unwrap()).collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1].get(0, 0), Some(Colour::rgb(0, 0, 255)));
    }

    fn write_gif(path: &Path, repeat: Option<Repeat>) {
        let file = File::create(path).unwrap();
        let mut encoder = GifEncoder::new(file);
        if let Some(repeat) = repeat {
            encoder.set_repeat(repeat).unwrap();
        }
        let delay = Delay::from_numer_denom_ms(100, 1);
        encoder
            .encode_frames(vec![
                Frame::from_parts(solid(1, 1, [255, 0, 0, 255]), 0, 0, delay),
                Frame::from_parts(solid(1, 1, [0, 0, 255, 255]), 0, 0, delay),
            ])
            .unwrap();
    }

    #[test]
    fn test_gif_loop_extension_wins_over_options() {
        let dir = tempdir().unwrap();
        let finite = dir.path().join("finite.gif");
        let forever = dir.path().join("forever.gif");
        write_gif(&finite, Some(Repeat::Finite(2)));
        write_gif(&forever, Some(Repeat::Infinite));

        let looping = MediaOptions { fps: 24, looping: true };
        let once = MediaOptions { fps: 24, looping: false };
        assert_eq!(gif_loop_count(&std::fs::read(&finite).unwrap()), Some(2));
        assert_eq!(gif_loop_count(&std::fs::read(&forever).unwrap()), Some(0));
        assert!(!MediaSource::open(&finite, looping).unwrap().info().looping);
        assert!(MediaSource::open(&forever, once).unwrap().info().looping);
    }

    #[test]
    fn test_gif_loop_count_by_hand() {
        let mut gif = b"GIF89a".to_vec();
        gif.extend_from_slice(&[1, 0, 1, 0, 0x80, 0, 0]);
        gif.extend_from_slice(&[0, 0, 0, 255, 255, 255]);
        // comment extension before the loop block
        gif.extend_from_slice(&[0x21, 0xFE, 2, b'h', b'i', 0]);
        gif.extend_from_slice(&[0x21, 0xFF, 11]);
        gif.extend_from_slice(b"NETSCAPE2.0");
        gif.extend_from_slice(&[3, 1, 5, 0, 0]);
        gif.push(0x2C);
        assert_eq!(gif_loop_count(&gif), Some(5));

        assert_eq!(gif_loop_count(&gif[..30]), None);
        assert_eq!(gif_loop_count(b"not a gif at all"), None);
    }

    #[test]
    fn test_gif_without_loop_extension_uses_options() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.gif");
        write_gif(&path, None);

        let once = MediaOptions { fps: 24, looping: false };
        assert!(!MediaSource::open(&path, once).unwrap().info().looping);
    }

    #[test]
    fn test_directory_sequence() {
        let dir = tempdir().unwrap();
        solid(1, 1, [2, 2, 2, 255]).save(dir.path().join("b.png")).unwrap();
        solid(1, 1, [1, 1, 1, 255]).save(dir.path().join("a.png")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let options = MediaOptions {
            fps: 12,
            looping: true,
        };
        let source = MediaSource::open(dir.path(), options).unwrap();
        let info = source.info();
        assert_eq!(info.frames, 2);
        assert_eq!(info.fps, 12);
        assert!(info.looping);

        let frames: Vec<PixelGrid> = source.frames().unwrap().map(|f| f.unwrap()).collect();
        assert_eq!(frames[0].get(0, 0), Some(Colour::rgb(1, 1, 1)));
        assert_eq!(frames[1].get(0, 0), Some(Colour::rgb(2, 2, 2)));
    }

    #[test]
    fn test_empty_directory_fails() {
        let dir = tempdir().unwrap();
        let result = MediaSource::open(dir.path(), MediaOptions::default());
        assert!(matches!(result, Err(HmicError::Media { .. })));
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = tempdir().unwrap();
        let result = MediaSource::open(dir.path().join("nope.png"), MediaOptions::default());
        assert!(matches!(result, Err(HmicError::Media { .. })));
    }
}
