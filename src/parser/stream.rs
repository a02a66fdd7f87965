//! Streaming parser: fixed-size chunks, bounded carry-over.
//!
//! The file is read twice, once per phase. Each phase is a small state
//! machine ([`HeaderScanner`], [`FrameScanner`]) fed one chunk at a time;
//! no token is assumed to fit inside a single chunk. While searching, a
//! scanner keeps at most [`CARRY_BOUND`] undecided bytes between chunks.
//! While inside a block it keeps the block's content, so memory is bounded
//! by the largest frame rather than by the file.

use std::io::{self, Read};
use std::mem;
use std::ops::ControlFlow;
use std::path::Path;

use tracing::debug;

use super::cancel::{check, CancelToken};
use super::grammar::{
    parse_frame_body, parse_header_body, scan_frame_open, scan_header_open, FrameRange, Scan,
};
use crate::container::Source;
use crate::error::{HmicError, Result};
use crate::types::{Command, Document, Header};

/// Default read size.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Most undecided bytes carried between chunks while searching for a
/// block opener. Longer than any marker a well-formed file contains.
pub const CARRY_BOUND: usize = 100;

/// A phase automaton that consumes a file chunk by chunk.
pub trait ChunkScanner {
    type Output;

    /// Consume the next chunk. `Break` means nothing further is needed.
    fn feed(&mut self, chunk: &[u8]) -> ControlFlow<()>;

    /// End of input: hand back whatever was completed.
    fn finish(self) -> Self::Output;
}

/// Parses an HMIC file without ever holding the whole of it.
#[derive(Debug, Clone)]
pub struct StreamingParser {
    source: Source,
    chunk_size: usize,
    cancel: Option<CancelToken>,
}

impl StreamingParser {
    /// Confirm the file (HMIC or HMIC7) can be opened; nothing is read yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_source(Source::open(path)?))
    }

    pub fn from_source(source: Source) -> Self {
        Self {
            source,
            chunk_size: DEFAULT_CHUNK_SIZE,
            cancel: None,
        }
    }

    /// Bytes requested per read (minimum 1).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Check `token` once per chunk and stop with `Cancelled` when set.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Header phase, then frame phase from the start of the file again.
    pub fn parse(&self) -> Result<Document> {
        let header = self.run(HeaderScanner::new())?;
        let commands = self.run(FrameScanner::new())?;
        debug!(
            keys = header.len(),
            commands = commands.len(),
            chunk_size = self.chunk_size,
            "streaming parse complete"
        );
        Ok(Document::new(header, commands))
    }

    fn run<S: ChunkScanner>(&self, mut scanner: S) -> Result<S::Output> {
        let mut reader = self.source.reader()?;
        let mut buf = vec![0u8; self.chunk_size];

        loop {
            check(self.cancel.as_ref())?;
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HmicError::io(self.source.path(), "Failed to read", e)),
            };
            if scanner.feed(&buf[..n]).is_break() {
                break;
            }
        }

        Ok(scanner.finish())
    }
}

/// Result of searching a window for a block opener.
enum Search<T> {
    /// Opener found; `next` is the index just past its `{`.
    Found { value: T, next: usize },
    /// No opener; bytes from `keep_from` are still undecided.
    Exhausted { keep_from: usize },
}

fn search<T>(window: &[u8], scan: impl Fn(&[u8], usize) -> Scan<T>) -> Search<T> {
    let mut pos = 0;
    while pos < window.len() {
        match scan(window, pos) {
            Scan::Found { value, next } => return Search::Found { value, next },
            Scan::Skip { next } => pos = next,
            Scan::Partial if window.len() - pos > CARRY_BOUND => pos += 1,
            Scan::Partial => return Search::Exhausted { keep_from: pos },
        }
    }
    Search::Exhausted { keep_from: pos }
}

/// Track brace depth across `bytes`; the index of the brace that brings it
/// to zero, if reached.
fn close_index(depth: &mut usize, bytes: &[u8]) -> Option<usize> {
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'{' => *depth += 1,
            b'}' => {
                *depth -= 1;
                if *depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderState {
    Searching,
    Collecting { depth: usize },
    Done,
}

/// Header phase: find the first `info{`, collect to its closing brace.
#[derive(Debug)]
pub struct HeaderScanner {
    state: HeaderState,
    carry: Vec<u8>,
    body: Vec<u8>,
    header: Header,
}

impl HeaderScanner {
    pub fn new() -> Self {
        Self {
            state: HeaderState::Searching,
            carry: Vec::new(),
            body: Vec::new(),
            header: Header::new(),
        }
    }

    fn consume(&mut self, bytes: &[u8]) {
        let mut pos = 0;
        while pos < bytes.len() {
            match &mut self.state {
                HeaderState::Searching => match search(&bytes[pos..], scan_header_open) {
                    Search::Found { next, .. } => {
                        self.state = HeaderState::Collecting { depth: 1 };
                        pos += next;
                    }
                    Search::Exhausted { keep_from } => {
                        self.carry.extend_from_slice(&bytes[pos + keep_from..]);
                        return;
                    }
                },
                HeaderState::Collecting { depth } => {
                    let rest = &bytes[pos..];
                    match close_index(depth, rest) {
                        Some(i) => {
                            self.body.extend_from_slice(&rest[..i]);
                            parse_header_body(&self.body, &mut self.header);
                            debug!(keys = self.header.len(), "header complete");
                            self.body = Vec::new();
                            self.state = HeaderState::Done;
                            return;
                        }
                        None => {
                            self.body.extend_from_slice(rest);
                            return;
                        }
                    }
                }
                HeaderState::Done => return,
            }
        }
    }
}

impl Default for HeaderScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkScanner for HeaderScanner {
    type Output = Header;

    fn feed(&mut self, chunk: &[u8]) -> ControlFlow<()> {
        match self.state {
            HeaderState::Searching => {
                let mut window = mem::take(&mut self.carry);
                window.extend_from_slice(chunk);
                self.consume(&window);
            }
            HeaderState::Collecting { .. } => self.consume(chunk),
            HeaderState::Done => {}
        }

        if self.state == HeaderState::Done {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn finish(self) -> Header {
        if let HeaderState::Collecting { .. } = self.state {
            debug!(bytes = self.body.len(), "header never closes");
        }
        self.header
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameState {
    LookingForFrame,
    InFrame { range: FrameRange, depth: usize },
}

/// Frame phase: find each `F<n>[-<m>]{`, collect to its closing brace and
/// parse the body. A frame still open at end of input is dropped.
#[derive(Debug)]
pub struct FrameScanner {
    state: FrameState,
    carry: Vec<u8>,
    body: Vec<u8>,
    commands: Vec<Command>,
    frames: usize,
}

impl FrameScanner {
    pub fn new() -> Self {
        Self {
            state: FrameState::LookingForFrame,
            carry: Vec::new(),
            body: Vec::new(),
            commands: Vec::new(),
            frames: 0,
        }
    }

    fn consume(&mut self, bytes: &[u8]) {
        let mut pos = 0;
        while pos < bytes.len() {
            match &mut self.state {
                FrameState::LookingForFrame => match search(&bytes[pos..], scan_frame_open) {
                    Search::Found { value, next } => {
                        self.state = FrameState::InFrame {
                            range: value,
                            depth: 1,
                        };
                        pos += next;
                    }
                    Search::Exhausted { keep_from } => {
                        self.carry.extend_from_slice(&bytes[pos + keep_from..]);
                        return;
                    }
                },
                FrameState::InFrame { range, depth } => {
                    let range = *range;
                    let rest = &bytes[pos..];
                    match close_index(depth, rest) {
                        Some(i) => {
                            self.body.extend_from_slice(&rest[..i]);
                            self.complete_frame(range);
                            pos += i + 1;
                        }
                        None => {
                            self.body.extend_from_slice(rest);
                            return;
                        }
                    }
                }
            }
        }
    }

    fn complete_frame(&mut self, range: FrameRange) {
        let before = self.commands.len();
        parse_frame_body(&self.body, range, &mut self.commands);
        debug!(
            start = range.start,
            end = range.end,
            bytes = self.body.len(),
            commands = self.commands.len() - before,
            "frame complete"
        );
        self.body.clear();
        self.frames += 1;
        self.state = FrameState::LookingForFrame;
    }
}

impl Default for FrameScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkScanner for FrameScanner {
    type Output = Vec<Command>;

    fn feed(&mut self, chunk: &[u8]) -> ControlFlow<()> {
        match self.state {
            FrameState::LookingForFrame => {
                let mut window = mem::take(&mut self.carry);
                window.extend_from_slice(chunk);
                self.consume(&window);
            }
            FrameState::InFrame { .. } => self.consume(chunk),
        }
        ControlFlow::Continue(())
    }

    fn finish(self) -> Vec<Command> {
        if let FrameState::InFrame { range, .. } = self.state {
            debug!(
                start = range.start,
                bytes = self.body.len(),
                "dropping frame that never closes"
            );
        }
        debug!(frames = self.frames, commands = self.commands.len(), "frames scanned");
        self.commands
    }
}
