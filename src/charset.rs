//! Character-class tables used by the URL boundary parser.
//!
//! Two kinds of lookup structures live here:
//! - [`ByteSet`]: a 256-bit ASCII membership bitmap with O(1), branch-free lookup
//! - [`SortedChars`]: a sorted sequence of Unicode scalar values searched by bisection
//!
//! All tables are process-wide constants; the sorted sequences are built once
//! on first use.

use once_cell::sync::Lazy;

/// Full stop and its internationalised equivalents (RFC 3490 section 3.1).
pub const LABEL_SEPARATORS: &str = "\u{002e}\u{3002}\u{ff0e}\u{ff61}";

/// Characters trimmed from both ends of an input before parsing.
pub const WHITESPACE: &str =
    " \t\n\u{000b}\u{000c}\r\u{feff}\u{200b}\u{200c}\u{200d}\u{00a0}\u{1680}\u{0085}\u{0000}";

/// Bytes that end the host when a port may follow.
pub const END_OF_HOST_WITH_PORT: ByteSet = ByteSet::new("/\\?#");

/// Bytes that end the host itself.
pub const END_OF_HOST: ByteSet = ByteSet::new("/\\?#:");

/// Bytes that can never appear in user info.
pub const INVALID_USER_INFO: ByteSet = ByteSet::new("/\\?#[]");

/// Valid first byte of a URL scheme.
pub const SCHEME_FIRST: ByteSet =
    ByteSet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz");

/// Valid non-first bytes of a URL scheme.
pub const SCHEME_REST: ByteSet =
    ByteSet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz1234567890+-.");

/// Label separators, sorted for binary search.
pub static SORTED_LABEL_SEPARATORS: Lazy<SortedChars> =
    Lazy::new(|| SortedChars::new(LABEL_SEPARATORS));

/// Whitespace, sorted for binary search.
pub static SORTED_WHITESPACE: Lazy<SortedChars> = Lazy::new(|| SortedChars::new(WHITESPACE));

/// Set of ASCII bytes.
///
/// Eight 32-bit words cover all 256 byte values so that lookup needs no bounds
/// check. Only the lower four words are ever populated: bytes >= 0x80 are
/// never members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteSet([u32; 8]);

impl ByteSet {
    /// Build a set from a string of ASCII characters.
    ///
    /// Panics (at compile time for `const` sets) on non-ASCII input.
    pub const fn new(chars: &str) -> Self {
        let bytes = chars.as_bytes();
        let mut words = [0u32; 8];
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            assert!(b < 0x80, "ByteSet only holds ASCII bytes");
            words[(b / 32) as usize] |= 1 << (b % 32);
            i += 1;
        }
        Self(words)
    }

    /// Check whether `b` is in the set.
    #[inline]
    pub const fn contains(&self, b: u8) -> bool {
        self.0[(b / 32) as usize] & (1 << (b % 32)) != 0
    }
}

/// Strictly ascending sequence of Unicode scalar values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedChars(Vec<char>);

impl SortedChars {
    /// Collect, sort and deduplicate the characters of `chars`.
    pub fn new(chars: &str) -> Self {
        let mut v: Vec<char> = chars.chars().collect();
        v.sort_unstable();
        v.dedup();
        Self(v)
    }

    /// Binary search membership test.
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.0.binary_search(&c).is_ok()
    }

    /// The sorted characters.
    pub fn as_slice(&self) -> &[char] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
