//! Render command implementation.
//!
//! Composites frames from an HMIC/HMIC7 file and writes PNG images.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::Config;
use crate::error::{HmicError, Result};
use crate::output::{display_path, plural, Printer};
use crate::parser::parse_file;
use crate::render::{write_png, FrameRenderer};

/// Render frames of an HMIC/HMIC7 file to PNG
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// File to render
    pub file: PathBuf,

    /// Output PNG (single frame) or directory (--all)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Frame to render (1-based)
    #[arg(long, conflicts_with = "all")]
    pub frame: Option<u32>,

    /// Render every frame as <name>_<index>.png
    #[arg(long)]
    pub all: bool,

    /// Integer upscaling factor
    #[arg(long, default_value = "1")]
    pub scale: u32,
}

pub fn run(args: RenderArgs, config: &Config, printer: &Printer) -> Result<Vec<PathBuf>> {
    let doc = parse_file(&args.file, config.parser, config.chunk_size, None)?;
    let renderer = FrameRenderer::new(&doc)?;
    let (width, height) = renderer.size();
    let stem = args
        .file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());

    let mut written = Vec::new();
    if args.all {
        create_dir(&args.output)?;
        for frame in renderer.render_all() {
            let path = args.output.join(format!("{}_{:04}.png", stem, frame.index));
            write_png(&frame, &path, args.scale)?;
            written.push(path);
        }
    } else {
        let index = args.frame.unwrap_or(1);
        let path = if args.output.is_dir() {
            args.output.join(format!("{}_{:04}.png", stem, index))
        } else {
            if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
                create_dir(parent)?;
            }
            args.output.clone()
        };
        write_png(&renderer.render(index), &path, args.scale)?;
        written.push(path);
    }

    printer.status(
        "Rendered",
        &format!(
            "{} from {} ({}x{}, scale {})",
            plural(written.len(), "frame", "frames"),
            display_path(&args.file),
            width,
            height,
            args.scale.max(1)
        ),
    );

    Ok(written)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| HmicError::io(path, "Failed to create output directory", e))
}
