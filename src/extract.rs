//! URL component extraction.
//!
//! The [`Extractor`] holds a [`SuffixTrie`] behind an `ArcSwap`, so
//! extractions never block and an update publishes a fully built trie in a
//! single atomic store. In-flight extractions finish on the trie they
//! loaded.

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use serde::Serialize;
use std::borrow::Cow;
use std::fs;
use std::net::Ipv6Addr;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::charset::{END_OF_HOST_WITH_PORT, INVALID_USER_INFO, SORTED_WHITESPACE};
use crate::config::{ExtractOptions, ExtractorConfig, SuffixListSource};
use crate::label::{looks_like_ipv4, normalize_separators, to_ascii_host};
use crate::remote::{Fetcher, HttpFetcher, RemoteSuffixList};
use crate::scan::{index_any_ascii, index_last_byte_before};
use crate::scheme::{scheme_end_index, scheme_name};
use crate::suffix::{SuffixLists, SuffixTrie};
use crate::{Error, Result};

/// Components extracted from a URL or bare host.
///
/// Every field may be empty. An empty `domain` and `suffix` on a non-IP
/// host means the host could not be classified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractResult {
    /// Lowercased scheme name without `:` or slashes
    pub scheme: String,
    pub user_info: String,
    /// Host as found in the input, without brackets, port or trailing dot
    pub host: String,
    pub sub_domain: String,
    pub domain: String,
    pub suffix: String,
    /// `domain.suffix`, empty unless both are present
    pub registered_domain: String,
    pub port: String,
    /// Everything from the first `/`, `\`, `?` or `#` after the host
    pub path: String,
    pub is_ipv4: bool,
    pub is_ipv6: bool,
}

/// Extract components from `input` using `trie`.
pub fn extract_with_trie(trie: &SuffixTrie, input: &str, opts: &ExtractOptions) -> ExtractResult {
    let mut result = ExtractResult::default();
    let mut rest = input.trim_matches(|c: char| SORTED_WHITESPACE.contains(c));

    if let Some(end) = scheme_end_index(rest) {
        result.scheme = scheme_name(&rest[..end]);
        rest = &rest[end..];
    }

    if let Some(at) = index_last_byte_before(rest, b'@', &INVALID_USER_INFO) {
        result.user_info = rest[..at].to_string();
        rest = &rest[at + 1..];
    }

    let (host, port, path, bracketed) = split_host(rest, &mut result);
    if opts.parse_port {
        result.port = port.to_string();
    }
    result.path = path.to_string();

    let normalized = normalize_separators(host);
    let host = normalized.strip_suffix('.').unwrap_or(&normalized);
    result.host = host.to_string();

    if bracketed {
        return result;
    }
    if host.contains(':') {
        log::debug!("Cannot classify host {:?}: stray ':'", host);
        return result;
    }
    if opts.detect_ipv4 && looks_like_ipv4(host) {
        result.is_ipv4 = true;
        return result;
    }

    let host: Cow<'_, str> = if opts.to_punycode {
        match to_ascii_host(host) {
            Ok(ascii) => Cow::Owned(ascii),
            Err(e) => {
                log::debug!("Cannot classify host {:?}: {}", host, e);
                return result;
            }
        }
    } else {
        Cow::Borrowed(host)
    };

    classify(trie, &host, opts, &mut result);
    result
}

/// Extract components from raw bytes using `trie`.
///
/// Invalid UTF-8 sequences never match a delimiter, so scheme, user info,
/// port and path split as they would for text. A host containing invalid
/// sequences is reported lossily and left unclassified.
pub fn extract_bytes_with_trie(
    trie: &SuffixTrie,
    input: &[u8],
    opts: &ExtractOptions,
) -> ExtractResult {
    if let Ok(text) = std::str::from_utf8(input) {
        return extract_with_trie(trie, text, opts);
    }

    let lossy = String::from_utf8_lossy(input);
    let mut result = extract_with_trie(trie, &lossy, opts);
    if result.host.contains(char::REPLACEMENT_CHARACTER) {
        log::debug!("Cannot classify host {:?}: invalid UTF-8", result.host);
        result.sub_domain.clear();
        result.domain.clear();
        result.suffix.clear();
        result.registered_domain.clear();
    }
    result
}

/// Split `rest` into host, port and path.
///
/// The flag is set for any `[...]` host; only valid IPv6 literals (with an
/// optional `%zone`) also set `is_ipv6`.
fn split_host<'a>(
    rest: &'a str,
    result: &mut ExtractResult,
) -> (&'a str, &'a str, &'a str, bool) {
    if let Some(inner) = rest.strip_prefix('[') {
        if let Some(close) = inner.find(']') {
            let literal = &inner[..close];
            let addr = literal.split_once('%').map_or(literal, |(addr, _)| addr);
            result.is_ipv6 = addr.parse::<Ipv6Addr>().is_ok();
            let after = &inner[close + 1..];
            let path_start = index_any_ascii(after, &END_OF_HOST_WITH_PORT).unwrap_or(after.len());
            let port = after[..path_start].strip_prefix(':').unwrap_or("");
            return (literal, port, &after[path_start..], true);
        }
    }

    let path_start = index_any_ascii(rest, &END_OF_HOST_WITH_PORT).unwrap_or(rest.len());
    let path = &rest[path_start..];
    match index_last_byte_before(rest, b':', &END_OF_HOST_WITH_PORT) {
        Some(colon) => (&rest[..colon], &rest[colon + 1..path_start], path, false),
        None => (&rest[..path_start], "", path, false),
    }
}

/// Fill sub_domain, domain, suffix and registered_domain.
fn classify(trie: &SuffixTrie, host: &str, opts: &ExtractOptions, result: &mut ExtractResult) {
    if host.is_empty() {
        return;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.iter().any(|l| l.is_empty()) {
        log::debug!("Cannot classify host {:?}: empty label", host);
        return;
    }
    let matched = trie.match_labels(&labels);
    let unmatched = labels.len() - matched;

    // byte offset where the suffix starts
    let suffix_start: usize = labels[..unmatched].iter().map(|l| l.len() + 1).sum();
    result.suffix = host[suffix_start.min(host.len())..].to_string();
    if unmatched == 0 {
        return;
    }

    result.domain = labels[unmatched - 1].to_string();
    if !opts.ignore_subdomains && unmatched > 1 {
        let sub_end = suffix_start - labels[unmatched - 1].len() - 2;
        result.sub_domain = host[..sub_end].to_string();
    }
    if !result.domain.is_empty() && !result.suffix.is_empty() {
        result.registered_domain = format!("{}.{}", result.domain, result.suffix);
    }
}

/// Public suffix extractor.
///
/// # Example
///
/// ```
/// use hostsplit::Extractor;
///
/// let extractor = Extractor::from_text("uk\nco.uk\n", false)?;
/// let result = extractor.extract("https://user@sub.example.co.uk:443/path");
/// assert_eq!(result.scheme, "https");
/// assert_eq!(result.sub_domain, "sub");
/// assert_eq!(result.domain, "example");
/// assert_eq!(result.suffix, "co.uk");
/// assert_eq!(result.port, "443");
/// # Ok::<(), hostsplit::Error>(())
/// ```
pub struct Extractor {
    /// Current trie, replaced wholesale on update
    trie: ArcSwap<SuffixTrie>,
    /// Whether private-domain rules are matched
    include_private: bool,
    /// Refresh source, if the list came from a URL
    remote: Option<RemoteSuffixList>,
    /// Serializes updates; extractions never take it
    update_lock: Mutex<()>,
    /// Incremented on each published trie
    generation: AtomicU64,
}

impl Extractor {
    /// Create an extractor, downloading over HTTP for remote sources.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        Self::with_fetcher(config, Box::new(HttpFetcher::new()))
    }

    /// Create an extractor that downloads remote sources with `fetcher`.
    pub fn with_fetcher(config: ExtractorConfig, fetcher: Box<dyn Fetcher>) -> Result<Self> {
        let source_name = config.source.name();
        let (lists, remote) = match config.source {
            SuffixListSource::Text(text) => (SuffixLists::from_bytes(text.as_bytes())?, None),
            SuffixListSource::File(path) => (Self::read_list_file(&path)?, None),
            SuffixListSource::Remote {
                url,
                cache_dir,
                update_interval,
            } => {
                let remote = RemoteSuffixList::new(&url, &cache_dir, fetcher)
                    .with_update_interval(update_interval);
                (remote.init()?, Some(remote))
            }
        };

        let trie = SuffixTrie::from_lists(&lists, config.include_private);
        log::info!(
            "Built suffix trie from {} source: {} rules ({} ICANN, {} private), private rules {}",
            source_name,
            trie.len(),
            lists.icann.len(),
            lists.private.len(),
            if config.include_private { "on" } else { "off" }
        );

        Ok(Self {
            trie: ArcSwap::from_pointee(trie),
            include_private: config.include_private,
            remote,
            update_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        })
    }

    /// Create an extractor from suffix list text.
    pub fn from_text(text: &str, include_private: bool) -> Result<Self> {
        let config = ExtractorConfig::new(SuffixListSource::Text(text.to_string()))
            .with_private(include_private);
        Self::new(config)
    }

    /// Create an extractor from a local suffix list file.
    pub fn from_file(path: &Path, include_private: bool) -> Result<Self> {
        let config = ExtractorConfig::new(SuffixListSource::File(path.to_path_buf()))
            .with_private(include_private);
        Self::new(config)
    }

    fn read_list_file(path: &Path) -> Result<SuffixLists> {
        let data = fs::read(path)?;
        SuffixLists::from_bytes(&data)
    }

    /// Extract with default options.
    pub fn extract(&self, input: &str) -> ExtractResult {
        self.extract_with(input, &ExtractOptions::default())
    }

    /// Extract with custom options.
    pub fn extract_with(&self, input: &str, opts: &ExtractOptions) -> ExtractResult {
        let trie = self.trie.load();
        extract_with_trie(&trie, input, opts)
    }

    /// Extract from raw bytes that may not be valid UTF-8.
    pub fn extract_bytes(&self, input: &[u8], opts: &ExtractOptions) -> ExtractResult {
        let trie = self.trie.load();
        extract_bytes_with_trie(&trie, input, opts)
    }

    /// Download a newer list and publish a rebuilt trie.
    ///
    /// Returns `true` if the trie was replaced. Fails with
    /// [`Error::UpdateUnsupported`] when the list has no remote source.
    pub fn update(&self) -> Result<bool> {
        let remote = self.remote.as_ref().ok_or(Error::UpdateUnsupported)?;
        let _guard = self.update_lock.lock();

        match remote.update()? {
            Some(lists) => {
                self.publish(SuffixTrie::from_lists(&lists, self.include_private));
                log::info!("Updated suffix list from {}", remote.url());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Update only if the source's update interval has elapsed.
    pub fn update_if_needed(&self) -> Result<bool> {
        let remote = self.remote.as_ref().ok_or(Error::UpdateUnsupported)?;
        if remote.needs_update() {
            self.update()
        } else {
            Ok(false)
        }
    }

    /// Publish a trie built from caller-supplied suffix list text.
    pub fn reload_from_text(&self, text: &str) -> Result<()> {
        let lists = SuffixLists::from_bytes(text.as_bytes())?;
        let _guard = self.update_lock.lock();
        self.publish(SuffixTrie::from_lists(&lists, self.include_private));
        log::info!("Reloaded suffix list from text: {} rules", lists.len());
        Ok(())
    }

    fn publish(&self, trie: SuffixTrie) {
        self.trie.store(Arc::new(trie));
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Snapshot of the current trie.
    pub fn trie(&self) -> Arc<SuffixTrie> {
        self.trie.load_full()
    }

    /// Number of rules in the current trie.
    pub fn rule_count(&self) -> usize {
        self.trie.load().len()
    }

    /// Number of tries published since construction.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn include_private(&self) -> bool {
        self.include_private
    }

    /// Whether [`update`](Self::update) is supported.
    pub fn is_refreshable(&self) -> bool {
        self.remote.is_some()
    }

    /// Last download of the remote list, if any.
    pub fn last_updated(&self) -> Option<SystemTime> {
        self.remote.as_ref().and_then(|r| r.last_updated())
    }
}
