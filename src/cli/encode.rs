//! Encode command implementation.
//!
//! Decodes media one frame at a time and writes HMIC or HMIC7, reporting
//! progress from an observer thread fed over a channel.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use clap::Args;

use crate::config::Config;
use crate::container::Container;
use crate::encode::{encode_to_file, progress, EncodeSummary, ProgressEvent};
use crate::error::{HmicError, Result};
use crate::media::MediaSource;
use crate::output::{display_path, format_bytes, plural, Printer};

/// Encode an image, GIF or image directory to HMIC/HMIC7
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Still image, animated GIF, or directory of images
    pub input: PathBuf,

    /// Output file (default: <output dir>/<input name>.<format>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Container format (default: from the output extension, then config)
    #[arg(long, value_enum)]
    pub format: Option<Container>,

    /// Frame rate for image directories
    #[arg(long)]
    pub fps: Option<u32>,

    /// Write LOOP=N for sequences and GIFs without a loop extension
    #[arg(long)]
    pub no_loop: bool,

    /// zstd compression level for HMIC7
    #[arg(long)]
    pub level: Option<i32>,
}

pub fn run(args: EncodeArgs, config: &Config, printer: &Printer) -> Result<EncodeSummary> {
    let mut config = config.clone();
    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    if let Some(level) = args.level {
        config.compression_level = level;
    }
    if args.no_loop {
        config.looping = false;
    }
    config.validate()?;

    let format = args
        .format
        .or_else(|| args.output.as_deref().and_then(Container::from_extension))
        .unwrap_or(config.format);
    let output = match &args.output {
        Some(path) => path.clone(),
        None => default_output(&args.input, &config.output, format)?,
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| HmicError::io(parent, "Failed to create output directory", e))?;
    }

    let source = MediaSource::open(&args.input, config.media_options())?;
    let info = source.info();
    printer.status(
        "Encoding",
        &format!(
            "{} ({}x{}, {}, {} FPS)",
            display_path(&args.input),
            info.width,
            info.height,
            plural(info.frames as usize, "frame", "frames"),
            info.fps
        ),
    );

    let (tx, rx) = progress::channel();
    let summary = thread::scope(|scope| {
        let observer = scope.spawn(|| {
            let mut total = 0;
            for event in rx {
                match event {
                    ProgressEvent::Started { total: t } => total = t,
                    ProgressEvent::Frame { index } => printer.progress("Frame", index, total),
                    ProgressEvent::Finished { .. } => {}
                }
            }
        });

        let result = encode_to_file(&source, &output, format, config.compression_level, Some(&tx));
        drop(tx);
        let _ = observer.join();
        result
    })?;

    let size = fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    printer.status(
        "Finished",
        &format!(
            "{} ({}, {})",
            printer.path(&output),
            plural(summary.frames as usize, "frame", "frames"),
            format_bytes(size)
        ),
    );

    Ok(summary)
}

/// `<dir>/<input stem>.<ext>`.
fn default_output(input: &Path, dir: &Path, format: Container) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| HmicError::Encode {
            message: format!("Cannot derive an output name from {}", input.display()),
            help: Some("Pass --output".to_string()),
        })?;
    Ok(dir.join(format!("{}.{}", stem.to_string_lossy(), format.extension())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::WholeFileParser;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn args(input: PathBuf, output: Option<PathBuf>) -> EncodeArgs {
        EncodeArgs {
            input,
            output,
            format: None,
            fps: None,
            no_loop: false,
            level: None,
        }
    }

    #[test]
    fn test_default_output() {
        let out = default_output(Path::new("in/clip.gif"), Path::new("out"), Container::Hmic7).unwrap();
        assert_eq!(out, PathBuf::from("out/clip.hmic7"));

        let out = default_output(Path::new("take.2.png"), Path::new("."), Container::Hmic).unwrap();
        assert_eq!(out, PathBuf::from("./take.2.hmic"));
    }

    #[test]
    fn test_encode_directory_with_overrides() {
        let dir = tempdir().unwrap();
        let frames = dir.path().join("frames");
        fs::create_dir(&frames).unwrap();
        RgbaImage::from_pixel(2, 1, Rgba([9, 9, 9, 255]))
            .save(frames.join("001.png"))
            .unwrap();
        RgbaImage::from_pixel(2, 1, Rgba([8, 8, 8, 255]))
            .save(frames.join("002.png"))
            .unwrap();

        let output = dir.path().join("nested/clip.hmic7");
        let mut a = args(frames, Some(output.clone()));
        a.fps = Some(6);
        a.no_loop = true;

        let summary = run(a, &Config::default(), &Printer::plain()).unwrap();
        assert_eq!(summary.frames, 2);

        let doc = WholeFileParser::open(&output).unwrap().parse().unwrap();
        assert_eq!(doc.header.fps(), Some(6));
        assert_eq!(doc.header.looping(), Some(false));
        assert_eq!(doc.header.frame_count(), Some(2));
        assert_eq!(doc.commands.len(), 2);
    }

    #[test]
    fn test_encode_uses_config_output_dir() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("dot.png");
        RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255])).save(&input).unwrap();

        let config = Config {
            output: dir.path().join("out"),
            ..Config::default()
        };
        run(args(input, None), &config, &Printer::plain()).unwrap();
        assert!(dir.path().join("out/dot.hmic").is_file());
    }

    #[test]
    fn test_encode_rejects_bad_level() {
        let dir = tempdir().unwrap();
        let mut a = args(dir.path().join("x.png"), None);
        a.level = Some(500);
        let result = run(a, &Config::default(), &Printer::plain());
        assert!(matches!(result, Err(HmicError::Config { .. })));
    }
}
