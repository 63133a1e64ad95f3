//! Remote suffix list download and on-disk caching.
//!
//! This module provides:
//! - [`Fetcher`]: the download seam, with [`HttpFetcher`] over `ureq`
//! - [`SuffixListCache`]: the cached list plus metadata, updated atomically
//! - [`RemoteSuffixList`]: cache-first loading and ETag-based refreshes

use flate2::read::GzDecoder;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::config::DEFAULT_UPDATE_INTERVAL;
use crate::metadata::CacheMetadata;
use crate::suffix::SuffixLists;
use crate::{Error, Result};

/// Default HTTP timeout for suffix list downloads.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Cache file name.
const LIST_FILE: &str = "public_suffix_list.dat";

/// Outcome of a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResponse {
    /// The server confirmed the cached copy is current (304)
    NotModified,
    /// New content, possibly gzip compressed
    Body { data: Vec<u8>, etag: Option<String> },
}

/// Downloads raw suffix list bytes.
pub trait Fetcher: Send + Sync {
    /// Fetch `url`, sending `etag` as `If-None-Match` when given.
    fn fetch(&self, url: &str, etag: Option<&str>) -> Result<FetchResponse>;
}

/// HTTP fetcher backed by a `ureq` agent.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a fetcher with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, etag: Option<&str>) -> Result<FetchResponse> {
        let mut request = self.agent.get(url);
        if let Some(etag) = etag {
            request = request.set("If-None-Match", etag);
        }

        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(304, _)) => return Ok(FetchResponse::NotModified),
            Err(ureq::Error::Status(code, _)) => {
                return Err(Error::Download(format!("HTTP error: {}", code)))
            }
            Err(ureq::Error::Transport(t)) => {
                return Err(Error::Download(format!("transport error: {}", t)))
            }
        };

        if response.status() == 304 {
            return Ok(FetchResponse::NotModified);
        }

        let etag = response.header("ETag").map(str::to_string);
        let mut data = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut data)
            .map_err(|e| Error::Download(format!("failed to read response: {}", e)))?;

        Ok(FetchResponse::Body { data, etag })
    }
}

/// Check if data is gzip compressed.
fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

/// Decompress `data` if it is gzip, otherwise return it unchanged.
pub fn decode_body(data: Vec<u8>) -> Result<Vec<u8>> {
    if !is_gzip(&data) {
        return Ok(data);
    }
    let mut decoder = GzDecoder::new(&data[..]);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| Error::Gzip(e.to_string()))?;
    Ok(out)
}

/// On-disk copy of a downloaded suffix list.
#[derive(Debug, Clone)]
pub struct SuffixListCache {
    dir: PathBuf,
}

impl SuffixListCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cached list.
    pub fn list_path(&self) -> PathBuf {
        self.dir.join(LIST_FILE)
    }

    fn meta_path(&self) -> PathBuf {
        self.dir.join(format!("{}.meta", LIST_FILE))
    }

    fn temp_path(&self) -> PathBuf {
        self.dir.join(format!("{}.tmp", LIST_FILE))
    }

    /// Metadata of the cached list; default when missing or unreadable.
    pub fn metadata(&self) -> CacheMetadata {
        match CacheMetadata::load(self.meta_path()) {
            Ok(meta) => meta,
            Err(e) => {
                log::warn!("Ignoring unreadable cache metadata: {}", e);
                CacheMetadata::default()
            }
        }
    }

    /// Read the cached list.
    ///
    /// Returns `None` when nothing is cached or the cached bytes do not
    /// match the recorded digest.
    pub fn read(&self) -> Result<Option<Vec<u8>>> {
        let path = self.list_path();
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read(&path)?;
        if !self.metadata().verify(&data) {
            log::warn!("Cached suffix list {:?} failed checksum verification", path);
            return Ok(None);
        }
        Ok(Some(data))
    }

    /// Replace the cached list atomically and record its metadata.
    pub fn write(&self, data: &[u8], meta: &CacheMetadata) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let temp_path = self.temp_path();
        let mut temp_file = fs::File::create(&temp_path)?;
        temp_file.write_all(data)?;
        temp_file.sync_all()?;
        drop(temp_file);

        fs::rename(&temp_path, self.list_path())?;
        meta.save(self.meta_path())
    }

    /// Record that the cached list was confirmed current.
    pub fn touch(&self) -> Result<()> {
        let mut meta = self.metadata();
        meta.touch();
        meta.save(self.meta_path())
    }
}

/// Suffix list downloaded from a URL and cached on disk.
pub struct RemoteSuffixList {
    url: String,
    cache: SuffixListCache,
    fetcher: Box<dyn Fetcher>,
    update_interval: Duration,
}

impl RemoteSuffixList {
    /// Create a remote list using `fetcher` for downloads.
    pub fn new(url: &str, cache_dir: &Path, fetcher: Box<dyn Fetcher>) -> Self {
        Self {
            url: url.to_string(),
            cache: SuffixListCache::new(cache_dir),
            fetcher,
            update_interval: DEFAULT_UPDATE_INTERVAL,
        }
    }

    /// Set the interval used by [`needs_update`](Self::needs_update).
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn cache(&self) -> &SuffixListCache {
        &self.cache
    }

    /// Load from cache, downloading if there is no usable cached list.
    pub fn init(&self) -> Result<SuffixLists> {
        fs::create_dir_all(self.cache.dir())?;

        match self.cache.read() {
            Ok(Some(data)) => match SuffixLists::from_bytes(&data) {
                Ok(lists) => {
                    log::info!(
                        "Loaded {} suffix rules from cache {:?}",
                        lists.len(),
                        self.cache.list_path()
                    );
                    return Ok(lists);
                }
                Err(e) => log::warn!("Cached suffix list unusable, will download: {}", e),
            },
            Ok(None) => log::info!("No cached suffix list, downloading {}", self.url),
            Err(e) => log::warn!("Failed to read cached suffix list, will download: {}", e),
        }

        match self.fetcher.fetch(&self.url, None)? {
            FetchResponse::Body { data, etag } => self.store(data, etag),
            FetchResponse::NotModified => Err(Error::Download(
                "unexpected 304 for unconditional request".to_string(),
            )),
        }
    }

    /// Check for a newer list.
    ///
    /// Returns `None` when the server reports the cached copy is current.
    pub fn update(&self) -> Result<Option<SuffixLists>> {
        let etag = if self.cache.list_path().exists() {
            self.cache.metadata().etag
        } else {
            None
        };

        match self.fetcher.fetch(&self.url, etag.as_deref())? {
            FetchResponse::NotModified => {
                log::debug!("Suffix list not modified (304)");
                self.cache.touch()?;
                Ok(None)
            }
            FetchResponse::Body { data, etag } => self.store(data, etag).map(Some),
        }
    }

    /// Decode, validate and cache a downloaded body.
    fn store(&self, raw: Vec<u8>, etag: Option<String>) -> Result<SuffixLists> {
        let raw_len = raw.len();
        let data = decode_body(raw)?;
        let lists = SuffixLists::from_bytes(&data)?;

        let meta = CacheMetadata::for_download(&data, etag, &self.url);
        self.cache.write(&data, &meta)?;

        log::info!(
            "Downloaded suffix list: {} rules, {} bytes ({} on the wire)",
            lists.len(),
            data.len(),
            raw_len
        );
        Ok(lists)
    }

    /// Whether the update interval has elapsed since the last update.
    pub fn needs_update(&self) -> bool {
        self.cache.metadata().needs_update(self.update_interval)
    }

    /// Last download or 304 confirmation.
    pub fn last_updated(&self) -> Option<SystemTime> {
        self.cache.metadata().last_updated
    }
}
