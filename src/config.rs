//! Extractor configuration types.

use std::path::PathBuf;
use std::time::Duration;

/// Canonical location of the public suffix list.
pub const DEFAULT_SUFFIX_LIST_URL: &str = "https://publicsuffix.org/list/public_suffix_list.dat";

/// Default interval between remote update checks (1 day).
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(86400);

/// Where suffix list text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuffixListSource {
    /// Suffix list text supplied by the caller
    Text(String),
    /// Local suffix list file; never refreshed
    File(PathBuf),
    /// Downloaded list, cached in `cache_dir`
    Remote {
        url: String,
        cache_dir: PathBuf,
        update_interval: Duration,
    },
}

impl SuffixListSource {
    /// Remote source for the canonical list with the default interval.
    pub fn remote(cache_dir: impl Into<PathBuf>) -> Self {
        Self::remote_url(DEFAULT_SUFFIX_LIST_URL, cache_dir)
    }

    /// Remote source for a custom URL with the default interval.
    pub fn remote_url(url: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Self {
        SuffixListSource::Remote {
            url: url.into(),
            cache_dir: cache_dir.into(),
            update_interval: DEFAULT_UPDATE_INTERVAL,
        }
    }

    /// Whether `Extractor::update` can refresh this source.
    pub fn is_refreshable(&self) -> bool {
        matches!(self, SuffixListSource::Remote { .. })
    }

    /// Short name used in log messages.
    pub fn name(&self) -> &'static str {
        match self {
            SuffixListSource::Text(_) => "text",
            SuffixListSource::File(_) => "file",
            SuffixListSource::Remote { .. } => "remote",
        }
    }
}

/// Configuration for an `Extractor`.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Suffix list source
    pub source: SuffixListSource,
    /// Match private-domain rules in addition to ICANN rules
    pub include_private: bool,
}

impl ExtractorConfig {
    /// Create a config matching ICANN rules only.
    pub fn new(source: SuffixListSource) -> Self {
        Self {
            source,
            include_private: false,
        }
    }

    /// Enable or disable private-domain rules.
    pub fn with_private(mut self, include_private: bool) -> Self {
        self.include_private = include_private;
        self
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::new(SuffixListSource::remote(
            std::env::temp_dir().join("hostsplit"),
        ))
    }
}

/// Per-call extraction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Leave `sub_domain` empty
    pub ignore_subdomains: bool,
    /// Convert the host to punycode before matching
    pub to_punycode: bool,
    /// Report dotted-quad hosts as IPv4 instead of matching them
    pub detect_ipv4: bool,
    /// Report the port
    pub parse_port: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            ignore_subdomains: false,
            to_punycode: false,
            detect_ipv4: true,
            parse_port: true,
        }
    }
}

impl ExtractOptions {
    pub fn ignore_subdomains(mut self, yes: bool) -> Self {
        self.ignore_subdomains = yes;
        self
    }

    pub fn to_punycode(mut self, yes: bool) -> Self {
        self.to_punycode = yes;
        self
    }

    pub fn detect_ipv4(mut self, yes: bool) -> Self {
        self.detect_ipv4 = yes;
        self
    }

    pub fn parse_port(mut self, yes: bool) -> Self {
        self.parse_port = yes;
        self
    }
}
