//! Parse result: header plus ordered command list.

use serde::Serialize;

use super::{Command, Header};

/// Everything a parser recovered from one file.
///
/// Commands keep their order of appearance in the source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub header: Header,
    pub commands: Vec<Command>,
}

impl Document {
    pub fn new(header: Header, commands: Vec<Command>) -> Self {
        Self { header, commands }
    }

    /// Commands drawing on the given frame, in source order.
    pub fn commands_for_frame(&self, frame: u32) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(move |c| c.applies_to(frame))
    }

    /// Highest frame index referenced by any command.
    pub fn last_frame(&self) -> Option<u32> {
        self.commands.iter().map(|c| c.frame_end).max()
    }

    /// Number of frames to play: the header's `F` when present, otherwise
    /// the highest frame referenced.
    pub fn frame_count(&self) -> u32 {
        self.header
            .frame_count()
            .or_else(|| self.last_frame())
            .unwrap_or(0)
    }

    /// Total pixel entries across all commands (not deduplicated).
    pub fn pixel_count(&self) -> usize {
        self.commands.iter().map(|c| c.pixels.len()).sum()
    }
}
