//! Boundary scanners over byte and character classes.

use crate::charset::{ByteSet, SortedChars};

/// Index of the first byte of `s` that is in `set`.
///
/// Works on raw bytes, so multi-byte sequences never match an ASCII set.
#[inline]
pub fn index_any_ascii(s: &str, set: &ByteSet) -> Option<usize> {
    s.bytes().position(|b| set.contains(b))
}

/// Byte offset of the first character of `s` that is in `chars`.
pub fn index_any(s: &str, chars: &SortedChars) -> Option<usize> {
    s.char_indices()
        .find(|&(_, c)| chars.contains(c))
        .map(|(i, _)| i)
}

/// Byte offset of the last character of `s` that occurs in `chars`.
pub fn last_index_any(s: &str, chars: &str) -> Option<usize> {
    s.char_indices()
        .rev()
        .find(|&(_, c)| chars.contains(c))
        .map(|(i, _)| i)
}

/// Index of the last `b` in `s` that comes before any byte of `not_after`.
///
/// When a byte of `not_after` occurs at `k`, only `s[..k]` is searched.
pub fn index_last_byte_before(s: &str, b: u8, not_after: &ByteSet) -> Option<usize> {
    let bytes = s.as_bytes();
    let end = index_any_ascii(s, not_after).unwrap_or(bytes.len());
    bytes[..end].iter().rposition(|&c| c == b)
}
