//! Colour type and colour-token decoding.

use std::fmt;

/// An RGBA colour value.
///
/// Ordering is lexicographic over `(r, g, b, a)`, which is the order the
/// encoder writes colour blocks in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent colour.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Magenta (used for undecodable colour tokens).
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);

    /// Decode a verbatim colour token as it appears in an HMIC frame.
    ///
    /// Supports formats:
    /// - `rgba(r,g,b,a)`
    /// - `rgb(r,g,b)` (alpha 255)
    /// - `#RRGGBB`
    ///
    /// The function prefixes are matched case-insensitively and whitespace
    /// around channel values is allowed. Returns `None` for anything else,
    /// including channel values above 255.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();

        if let Some(hex) = token.strip_prefix('#') {
            return Self::from_hex(hex);
        }

        let lower = token.to_ascii_lowercase();
        if let Some(inner) = lower
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let [r, g, b, a] = parse_channels::<4>(inner)?;
            return Some(Self::new(r, g, b, a));
        }
        if let Some(inner) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let [r, g, b] = parse_channels::<3>(inner)?;
            return Some(Self::rgb(r, g, b));
        }

        None
    }

    /// Parse six hex digits (no leading `#`).
    fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::rgb(r, g, b))
    }

    /// Convert to RGBA array.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Check if the colour is fully transparent.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }
}

impl From<[u8; 4]> for Colour {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

/// Formats as the `rgba(r,g,b,a)` token the frame writer emits.
impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

fn parse_channels<const N: usize>(inner: &str) -> Option<[u8; N]> {
    let mut channels = [0u8; N];
    let mut parts = inner.split(',');
    for channel in channels.iter_mut() {
        *channel = parts.next()?.trim().parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_rgba() {
        assert_eq!(
            Colour::from_token("rgba(255,0,0,128)"),
            Some(Colour::new(255, 0, 0, 128))
        );
        assert_eq!(
            Colour::from_token("RGBA( 1, 2, 3, 4 )"),
            Some(Colour::new(1, 2, 3, 4))
        );
    }

    #[test]
    fn test_from_token_rgb() {
        assert_eq!(Colour::from_token("rgb(0,0,255)"), Some(Colour::rgb(0, 0, 255)));
    }

    #[test]
    fn test_from_token_hex() {
        assert_eq!(Colour::from_token("#FF0000"), Some(Colour::rgb(255, 0, 0)));
        assert_eq!(Colour::from_token("#1a1a2e"), Some(Colour::rgb(0x1a, 0x1a, 0x2e)));
    }

    #[test]
    fn test_from_token_invalid() {
        assert_eq!(Colour::from_token("#GGGGGG"), None);
        assert_eq!(Colour::from_token("#FFF"), None);
        assert_eq!(Colour::from_token("rgb(256,0,0)"), None);
        assert_eq!(Colour::from_token("rgb(1,2)"), None);
        assert_eq!(Colour::from_token("rgba(1,2,3,4,5)"), None);
        assert_eq!(Colour::from_token("red"), None);
        assert_eq!(Colour::from_token(""), None);
    }

    #[test]
    fn test_display_is_rgba_token() {
        assert_eq!(Colour::new(255, 0, 0, 255).to_string(), "rgba(255,0,0,255)");
        assert_eq!(
            Colour::from_token(&Colour::new(9, 8, 7, 6).to_string()),
            Some(Colour::new(9, 8, 7, 6))
        );
    }

    #[test]
    fn test_ordering_is_channel_lexicographic() {
        let mut colours = vec![
            Colour::new(0, 0, 255, 255),
            Colour::new(255, 0, 0, 255),
            Colour::new(0, 0, 255, 0),
        ];
        colours.sort();
        assert_eq!(
            colours,
            vec![
                Colour::new(0, 0, 255, 0),
                Colour::new(0, 0, 255, 255),
                Colour::new(255, 0, 0, 255),
            ]
        );
    }

    #[test]
    fn test_constants() {
        assert!(Colour::TRANSPARENT.is_transparent());
        assert_eq!(Colour::BLACK.to_rgba(), [0, 0, 0, 255]);
        assert_eq!(Colour::from([1, 2, 3, 4]), Colour::new(1, 2, 3, 4));
    }
}
