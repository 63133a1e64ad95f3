//! Metadata stored next to the cached suffix list.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::error::{Error, Result};

/// Download bookkeeping for a cached suffix list.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CacheMetadata {
    /// When the list was last downloaded or confirmed unchanged
    #[serde(with = "unix_seconds")]
    pub last_updated: Option<SystemTime>,
    /// ETag returned with the cached body
    pub etag: Option<String>,
    /// Hex SHA-256 of the cached list
    pub sha256: Option<String>,
    /// URL the list was downloaded from
    pub url: Option<String>,
}

mod unix_seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        time.map(|t| t.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs())
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SystemTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(|s| UNIX_EPOCH + Duration::from_secs(s)))
    }
}

/// Hex-encoded SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

impl CacheMetadata {
    /// Metadata for a list downloaded just now.
    pub fn for_download(data: &[u8], etag: Option<String>, url: &str) -> Self {
        Self {
            last_updated: Some(SystemTime::now()),
            etag,
            sha256: Some(sha256_hex(data)),
            url: Some(url.to_string()),
        }
    }

    /// Mark the cached list as confirmed current.
    pub fn touch(&mut self) {
        self.last_updated = Some(SystemTime::now());
    }

    /// Check `data` against the stored digest.
    ///
    /// Data is accepted when no digest was recorded.
    pub fn verify(&self, data: &[u8]) -> bool {
        match &self.sha256 {
            Some(expected) => *expected == sha256_hex(data),
            None => true,
        }
    }

    /// Load metadata from a file.
    ///
    /// Returns default metadata if the file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save metadata to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check whether `interval` has elapsed since the last update.
    pub fn needs_update(&self, interval: Duration) -> bool {
        match self.last_updated {
            None => true,
            Some(last) => {
                let elapsed = SystemTime::now()
                    .duration_since(last)
                    .unwrap_or(Duration::MAX);
                elapsed >= interval
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_metadata_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.meta");
        let meta = CacheMetadata::for_download(b"com\n", Some("\"abc\"".to_string()), "http://x");
        meta.save(&path).unwrap();

        let loaded = CacheMetadata::load(&path).unwrap();
        assert!(loaded.last_updated.is_some());
        assert_eq!(loaded.etag.as_deref(), Some("\"abc\""));
        assert_eq!(loaded.url.as_deref(), Some("http://x"));
        assert_eq!(loaded.sha256, meta.sha256);
    }

    #[test]
    fn test_metadata_missing_file() {
        let loaded = CacheMetadata::load("/nonexistent/path.meta").unwrap();
        assert_eq!(loaded, CacheMetadata::default());
    }

    #[test]
    fn test_metadata_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.meta");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(CacheMetadata::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_verify_digest() {
        let meta = CacheMetadata::for_download(b"com\n", None, "http://x");
        assert!(meta.verify(b"com\n"));
        assert!(!meta.verify(b"net\n"));
        assert!(CacheMetadata::default().verify(b"anything"));
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_needs_update() {
        let mut meta = CacheMetadata {
            last_updated: Some(SystemTime::now() - Duration::from_secs(3600)),
            ..Default::default()
        };
        assert!(meta.needs_update(Duration::from_secs(1800)));
        assert!(!meta.needs_update(Duration::from_secs(7200)));

        meta.touch();
        assert!(!meta.needs_update(Duration::from_secs(1800)));
        assert!(CacheMetadata::default().needs_update(Duration::from_secs(1)));
    }
}
