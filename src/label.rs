//! Label normalization: separator folding, punycode conversion and IPv4 detection.

use std::borrow::Cow;

use crate::charset::SORTED_LABEL_SEPARATORS;
use crate::error::{Error, Result};
use crate::scan::index_any;

/// Replace every internationalised full stop in `s` with ASCII `.`.
///
/// Borrows when `s` holds nothing to replace.
pub fn normalize_separators(s: &str) -> Cow<'_, str> {
    let seps = &*SORTED_LABEL_SEPARATORS;
    let first = match s.char_indices().find(|&(_, c)| c != '.' && seps.contains(c)) {
        Some((i, _)) => i,
        None => return Cow::Borrowed(s),
    };

    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..first]);
    for c in s[first..].chars() {
        if seps.contains(c) {
            out.push('.');
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Convert a single label to its ASCII-compatible encoding.
///
/// ASCII labels are returned unchanged.
pub fn to_ascii_label(label: &str) -> Result<String> {
    if label.is_ascii() {
        return Ok(label.to_string());
    }
    idna::domain_to_ascii(label).map_err(|e| Error::InvalidLabel(format!("{}: {:?}", label, e)))
}

/// Convert a whole host to ASCII-compatible form, label by label.
///
/// Separators are normalized first. Fails on the first label that cannot
/// be converted.
pub fn to_ascii_host(host: &str) -> Result<String> {
    let host = normalize_separators(host);
    if host.is_ascii() {
        return Ok(host.into_owned());
    }

    let mut out = String::with_capacity(host.len() * 2);
    for (i, label) in host.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(&to_ascii_label(label)?);
    }
    Ok(out)
}

/// Check whether `host` is a dotted-quad IPv4 address.
///
/// Each of the four parts must be 1-3 decimal digits no greater than 255.
pub fn looks_like_ipv4(host: &str) -> bool {
    // cheap reject before splitting
    if host.len() < 7 || host.len() > 15 || index_any(host, &SORTED_LABEL_SEPARATORS).is_none() {
        return false;
    }

    let mut parts = 0;
    for part in host.split('.') {
        parts += 1;
        if parts > 4 || part.is_empty() || part.len() > 3 {
            return false;
        }
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        match part.parse::<u16>() {
            Ok(n) if n <= 255 => {}
            _ => return false,
        }
    }
    parts == 4
}
