pub mod completions;
pub mod encode;
pub mod info;
pub mod render;
pub mod validate;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// hmic - HMIC pixel-animation codec
#[derive(Parser, Debug)]
#[command(name = "hmic")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ./hmic.yaml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode an image, GIF or image directory to HMIC/HMIC7
    Encode(encode::EncodeArgs),

    /// Show header and counts for an HMIC/HMIC7 file
    Info(info::InfoArgs),

    /// Render frames of an HMIC/HMIC7 file to PNG
    Render(render::RenderArgs),

    /// Check HMIC/HMIC7 files for problems a lenient parse tolerates
    Validate(validate::ValidateArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

impl Cli {
    /// Default log filter for the verbosity flag.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
