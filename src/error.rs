//! Error types for hostsplit.

use thiserror::Error;

/// Error type for hostsplit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Suffix list download failed
    #[error("download error: {0}")]
    Download(String),

    /// Gzip body could not be decompressed
    #[error("gzip decompression failed: {0}")]
    Gzip(String),

    /// Suffix list text is unusable (not UTF-8, no rules)
    #[error("invalid suffix list: {0}")]
    InvalidSuffixList(String),

    /// Label could not be converted to ASCII-compatible form
    #[error("invalid label: {0}")]
    InvalidLabel(String),

    /// Update requested for a suffix list without a remote source
    #[error("suffix list has no remote source to update from")]
    UpdateUnsupported,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for hostsplit operations.
pub type Result<T> = std::result::Result<T, Error>;
