//! The `info{...}` header block.

use std::collections::BTreeMap;

use serde::Serialize;

/// Display size key, value `<W>X<H>`.
pub const KEY_DISPLAY: &str = "DISPLAY";
/// Frame rate key, integer value.
pub const KEY_FPS: &str = "FPS";
/// Frame count key, integer value.
pub const KEY_FRAMES: &str = "F";
/// Loop flag key, `Y` or `N`.
pub const KEY_LOOP: &str = "LOOP";

/// Keys the writer emits first, in this order.
const CANONICAL_ORDER: [&str; 4] = [KEY_DISPLAY, KEY_FPS, KEY_FRAMES, KEY_LOOP];

/// Header metadata: uppercase key to raw value.
///
/// Values are stored verbatim; the typed accessors interpret the
/// recognized keys but nothing is enforced on insert. Inserting an existing
/// key overwrites the previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Header {
    entries: BTreeMap<String, String>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, uppercasing the key.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(key.as_ref().to_ascii_uppercase(), value.into());
    }

    /// Look up a raw value (key is matched case-insensitively).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries in writer order: DISPLAY, FPS, F, LOOP, then the rest by key.
    pub fn ordered(&self) -> Vec<(&str, &str)> {
        let mut ordered: Vec<(&str, &str)> = CANONICAL_ORDER
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect();
        ordered.extend(
            self.iter()
                .filter(|(key, _)| !CANONICAL_ORDER.contains(key)),
        );
        ordered
    }

    /// Parse `DISPLAY=<W>X<H>` (separator `X` or `x`).
    pub fn display(&self) -> Option<(u32, u32)> {
        let value = self.get(KEY_DISPLAY)?;
        let (w, h) = value.split_once(|c: char| c == 'X' || c == 'x')?;
        Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
    }

    /// Parse `FPS=<int>`.
    pub fn fps(&self) -> Option<u32> {
        self.get(KEY_FPS)?.trim().parse().ok()
    }

    /// Parse `F=<int>` (declared frame count).
    pub fn frame_count(&self) -> Option<u32> {
        self.get(KEY_FRAMES)?.trim().parse().ok()
    }

    /// Parse `LOOP=Y|N`.
    pub fn looping(&self) -> Option<bool> {
        match self.get(KEY_LOOP)?.trim() {
            v if v.eq_ignore_ascii_case("y") => Some(true),
            v if v.eq_ignore_ascii_case("n") => Some(false),
            _ => None,
        }
    }
}

/// Stream parameters the encoder writes into the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub frames: u32,
    pub looping: bool,
}

impl From<StreamInfo> for Header {
    fn from(info: StreamInfo) -> Self {
        let mut header = Header::new();
        header.insert(KEY_DISPLAY, format!("{}X{}", info.width, info.height));
        header.insert(KEY_FPS, info.fps.to_string());
        header.insert(KEY_FRAMES, info.frames.to_string());
        header.insert(KEY_LOOP, if info.looping { "Y" } else { "N" });
        header
    }
}
