//! Allocation-free byte-window primitives shared by both parsers.
//!
//! Every function here takes a borrowed slice and positions into it; none
//! of them copy or allocate.

/// Case-insensitive (ASCII) comparison of the first `literal.len()` bytes.
///
/// Returns `false` if the window is shorter than the literal.
pub fn prefix_match_ci(window: &[u8], literal: &[u8]) -> bool {
    window.len() >= literal.len() && window[..literal.len()].eq_ignore_ascii_case(literal)
}

/// Whether `window` is a case-insensitive prefix of `literal` that stops
/// short of it, i.e. more bytes could still complete the literal.
pub fn partial_match_ci(window: &[u8], literal: &[u8]) -> bool {
    window.len() < literal.len() && literal[..window.len()].eq_ignore_ascii_case(window)
}

/// Consume consecutive ASCII digits starting at `pos`.
///
/// Returns the value and the index just past the last digit, or `None`
/// when no digit was consumed (distinct from a parsed `0`). Values beyond
/// `u32::MAX` saturate.
pub fn take_leading_int(window: &[u8], pos: usize) -> Option<(u32, usize)> {
    let mut end = pos;
    let mut value: u32 = 0;
    while let Some(&b) = window.get(end) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.saturating_mul(10).saturating_add(u32::from(b - b'0'));
        end += 1;
    }
    (end > pos).then_some((value, end))
}

/// Given `window[open_pos] == b'{'`, find the brace that brings the depth
/// back to zero. `None` if the window ends first.
pub fn find_matching_brace(window: &[u8], open_pos: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, &b) in window.get(open_pos..)?.iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some(open_pos + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Strip leading and trailing ASCII whitespace by narrowing the slice.
pub fn trim(window: &[u8]) -> &[u8] {
    window.trim_ascii()
}

/// Index of the first non-whitespace byte at or after `pos`.
pub fn skip_whitespace(window: &[u8], mut pos: usize) -> usize {
    while window.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    pos
}

/// Split on `\n` and trim each line; empty lines are kept (as empty slices).
pub fn trimmed_lines(window: &[u8]) -> impl Iterator<Item = &[u8]> {
    window.split(|&b| b == b'\n').map(trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_match_ci() {
        assert!(prefix_match_ci(b"INFO{", b"info"));
        assert!(prefix_match_ci(b"iNfO", b"info"));
        assert!(prefix_match_ci(b"info", b""));
        assert!(!prefix_match_ci(b"inf", b"info"));
        assert!(!prefix_match_ci(b"inko", b"info"));
    }

    #[test]
    fn test_partial_match_ci() {
        assert!(partial_match_ci(b"", b"info"));
        assert!(partial_match_ci(b"IN", b"info"));
        assert!(!partial_match_ci(b"info", b"info"));
        assert!(!partial_match_ci(b"ix", b"info"));
    }

    #[test]
    fn test_take_leading_int() {
        assert_eq!(take_leading_int(b"123x", 0), Some((123, 3)));
        assert_eq!(take_leading_int(b"F42{", 1), Some((42, 3)));
        assert_eq!(take_leading_int(b"0", 0), Some((0, 1)));
        assert_eq!(take_leading_int(b"x1", 0), None);
        assert_eq!(take_leading_int(b"12", 2), None);
        assert_eq!(take_leading_int(b"12", 9), None);
    }

    #[test]
    fn test_take_leading_int_saturates() {
        assert_eq!(
            take_leading_int(b"99999999999999", 0),
            Some((u32::MAX, 14))
        );
    }

    #[test]
    fn test_find_matching_brace() {
        assert_eq!(find_matching_brace(b"{}", 0), Some(1));
        assert_eq!(find_matching_brace(b"a{b{c}d}e", 1), Some(7));
        assert_eq!(find_matching_brace(b"{{}", 0), None);
        assert_eq!(find_matching_brace(b"{", 0), None);
        assert_eq!(find_matching_brace(b"{}", 5), None);
    }

    #[test]
    fn test_trim() {
        assert_eq!(trim(b"  P=1x1\r\n"), b"P=1x1");
        assert_eq!(trim(b" \t "), b"");
        assert_eq!(trim(b""), b"");
        assert_eq!(trim(b"a b"), b"a b");
    }

    #[test]
    fn test_skip_whitespace() {
        assert_eq!(skip_whitespace(b"  \n{", 0), 3);
        assert_eq!(skip_whitespace(b"{", 0), 0);
        assert_eq!(skip_whitespace(b"   ", 0), 3);
    }

    #[test]
    fn test_trimmed_lines() {
        let lines: Vec<&[u8]> = trimmed_lines(b" a \n\n b").collect();
        assert_eq!(lines, vec![&b"a"[..], &b""[..], &b"b"[..]]);
    }
}
