//! Terminal output for the hmic CLI.
//!
//! Cargo-style status lines with right-aligned coloured verbs, written to
//! stderr. Stdout is reserved for machine-readable output (`info --json`,
//! shell completions).

use std::io::{self, IsTerminal, Write};
use std::path::Path;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const CLEAR_LINE: &str = "\x1b[2K";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Colour of a status verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Work done (green).
    Done,
    /// Facts and progress (cyan).
    Note,
    /// Something worth a look (yellow).
    Warn,
    /// Failure (red).
    Fail,
}

impl Tone {
    fn ansi(self) -> &'static str {
        match self {
            Tone::Done => "\x1b[32m",
            Tone::Note => "\x1b[36m",
            Tone::Warn => "\x1b[33m",
            Tone::Fail => "\x1b[31m",
        }
    }
}

/// Terminal-aware status printer.
///
/// Colour and in-place progress are enabled when stderr is a terminal.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    color: bool,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// Plain printer regardless of the terminal.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// "    Encoding clip.gif (64x64, 12 frames)"
    pub fn line(&self, tone: Tone, verb: &str, message: &str) {
        let line = self.format_line(tone, verb, message);
        let _ = writeln!(io::stderr().lock(), "{line}");
    }

    pub fn status(&self, verb: &str, message: &str) {
        self.line(Tone::Done, verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.line(Tone::Note, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.line(Tone::Warn, verb, message);
    }

    pub fn error(&self, verb: &str, message: &str) {
        self.line(Tone::Fail, verb, message);
    }

    /// `done/total` counter. On a terminal the line is redrawn in place;
    /// otherwise only the final count is printed.
    pub fn progress(&self, verb: &str, done: u32, total: u32) {
        let line = self.format_line(Tone::Note, verb, &format!("{}/{}", done, total));
        let finished = done >= total;
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = write!(stderr, "\r{CLEAR_LINE}{line}");
            if finished {
                let _ = writeln!(stderr);
            }
            let _ = stderr.flush();
        } else if finished {
            let _ = writeln!(stderr, "{line}");
        }
    }

    /// A path as shown to the user, highlighted on a terminal.
    pub fn path(&self, path: &Path) -> String {
        let shown = display_path(path);
        if self.color {
            format!("{}{shown}{RESET}", Tone::Note.ansi())
        } else {
            shown
        }
    }

    fn format_line(&self, tone: Tone, verb: &str, message: &str) -> String {
        if self.color {
            format!("{BOLD}{}{verb:>VERB_WIDTH$}{RESET} {message}", tone.ansi())
        } else {
            format!("{verb:>VERB_WIDTH$} {message}")
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pluralize a count: `plural(1, "frame", "frames")` gives "1 frame".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    let word = if n == 1 { singular } else { pluralized };
    format!("{} {}", n, word)
}

/// Relative to the working directory when under it, as given otherwise.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));
    match relative {
        Some(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Some(rel) => rel.display().to_string(),
        None => path.display().to_string(),
    }
}

/// Human-readable byte size in binary units.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
