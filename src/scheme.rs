//! URL scheme detection.
//!
//! Permissive on purpose: `http://`, `//` and `\\` all count as scheme
//! prefixes, while `1http://` and `http:/x` do not.

use crate::charset::{SCHEME_FIRST, SCHEME_REST};

#[inline]
fn is_slash(b: u8) -> bool {
    b == b'/' || b == b'\\'
}

/// Find where the scheme prefix of `s` ends, including the `://` part.
///
/// Returns the offset of the first byte after the scheme, or `None` if `s`
/// does not start with a scheme.
///
/// # Examples
/// ```
/// use hostsplit::scheme_end_index;
///
/// assert_eq!(scheme_end_index("https://example.com"), Some(8));
/// assert_eq!(scheme_end_index("//example.com"), Some(2));
/// assert_eq!(scheme_end_index("example.com"), None);
/// ```
pub fn scheme_end_index(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let (&first, rest) = bytes.split_first()?;

    let mut slashes = 0usize;
    if is_slash(first) {
        slashes = 1;
    } else if !SCHEME_FIRST.contains(first) {
        return None;
    }

    let mut colon = false;
    for (offset, &b) in rest.iter().enumerate() {
        let i = offset + 1;
        if slashes == 0 {
            if !colon {
                if SCHEME_REST.contains(b) {
                    continue;
                }
                if b == b':' {
                    colon = true;
                    continue;
                }
            }
            if is_slash(b) {
                slashes = 1;
                continue;
            }
            return None;
        }

        if is_slash(b) {
            slashes += 1;
            continue;
        }
        return if slashes >= 2 { Some(i) } else { None };
    }

    if slashes >= 2 {
        Some(bytes.len())
    } else {
        None
    }
}

/// Scheme name from a prefix found by [`scheme_end_index`], lowercased.
///
/// `"HTTPS://"` becomes `"https"`; slash-only prefixes give an empty name.
pub fn scheme_name(prefix: &str) -> String {
    let name = prefix.find(':').map_or("", |i| &prefix[..i]);
    name.to_ascii_lowercase()
}
