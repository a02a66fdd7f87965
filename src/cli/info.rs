//! Info command implementation.

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::config::Config;
use crate::container::{Container, Source};
use crate::error::Result;
use crate::output::{format_bytes, plural, Printer};
use crate::parser::{parse_file, ParserKind};
use crate::types::{Document, Header};

/// Show header and counts for an HMIC/HMIC7 file
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// File to inspect
    pub file: PathBuf,

    /// Use the streaming parser
    #[arg(long)]
    pub streaming: bool,

    /// Streaming read size in bytes
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Print JSON to stdout
    #[arg(long)]
    pub json: bool,
}

/// Summary of one parsed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub path: PathBuf,
    pub container: Container,
    pub parser: ParserKind,
    pub bytes: u64,
    pub header: Header,
    pub frames: u32,
    pub commands: usize,
    pub pixels: usize,
    pub colours: usize,
}

impl FileInfo {
    pub fn new(
        path: PathBuf,
        container: Container,
        parser: ParserKind,
        bytes: u64,
        doc: &Document,
    ) -> Self {
        let colours: BTreeSet<&str> = doc.commands.iter().map(|c| c.color.as_str()).collect();
        Self {
            path,
            container,
            parser,
            bytes,
            header: doc.header.clone(),
            frames: doc.frame_count(),
            commands: doc.commands.len(),
            pixels: doc.pixel_count(),
            colours: colours.len(),
        }
    }
}

pub fn run(args: InfoArgs, config: &Config, printer: &Printer) -> Result<FileInfo> {
    let parser = if args.streaming {
        ParserKind::Streaming
    } else {
        config.parser
    };
    let chunk_size = args.chunk_size.unwrap_or(config.chunk_size);

    let source = Source::open(&args.file)?;
    let bytes = std::fs::metadata(&args.file).map(|m| m.len()).unwrap_or(0);
    let doc = parse_file(&args.file, parser, chunk_size, None)?;
    let info = FileInfo::new(args.file.clone(), source.container(), parser, bytes, &doc);

    if args.json {
        let json = serde_json::to_string_pretty(&info)?;
        println!("{}", json);
    } else {
        print_info(&info, printer);
    }

    Ok(info)
}

fn print_info(info: &FileInfo, printer: &Printer) {
    printer.info(
        "File",
        &format!(
            "{} ({}, {})",
            printer.path(&info.path),
            info.container.extension().to_uppercase(),
            format_bytes(info.bytes)
        ),
    );
    if info.header.is_empty() {
        printer.warning("Header", "none");
    }
    for (key, value) in info.header.ordered() {
        printer.info(key, value);
    }
    printer.info("Frames", &info.frames.to_string());
    printer.info(
        "Commands",
        &format!(
            "{}, {}",
            plural(info.commands, "command", "commands"),
            plural(info.colours, "colour", "colours")
        ),
    );
    printer.info("Pixels", &info.pixels.to_string());
}
