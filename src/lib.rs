//! hostsplit - public suffix aware URL component extraction.
//!
//! This crate splits a URL or bare host into scheme, user info, subdomain,
//! registrable domain, public suffix, port and path, using the public
//! suffix list to decide where the effective top-level domain begins.
//!
//! # Features
//!
//! - **Boundary parser**: character-class tables locate scheme, user info,
//!   host and port without a general URI grammar
//! - **Suffix trie**: reversed-label trie with wildcard and exception rules
//! - **ICANN / private sections**: match ICANN rules only, or both
//! - **IP hosts**: dotted-quad IPv4 and bracketed IPv6 hosts skip matching
//! - **Punycode**: optional conversion of internationalised hosts
//! - **Hot update**: refresh the list from a URL and swap the trie atomically
//!
//! # Quick Start
//!
//! ```
//! use hostsplit::Extractor;
//!
//! let extractor = Extractor::from_text("com\nuk\nco.uk\n", false)?;
//!
//! let result = extractor.extract("https://www.example.co.uk:8080/index.html");
//! assert_eq!(result.sub_domain, "www");
//! assert_eq!(result.domain, "example");
//! assert_eq!(result.suffix, "co.uk");
//! assert_eq!(result.port, "8080");
//! # Ok::<(), hostsplit::Error>(())
//! ```
//!
//! # Remote Lists
//!
//! ```ignore
//! use hostsplit::{Extractor, ExtractorConfig, SuffixListSource};
//!
//! // Loads from cache, downloading the list on first use
//! let config = ExtractorConfig::new(SuffixListSource::remote("/tmp/hostsplit-cache"))
//!     .with_private(true);
//! let extractor = Extractor::new(config)?;
//!
//! // Conditional download (ETag); the new trie is swapped in atomically
//! if extractor.update_if_needed()? {
//!     println!("Suffix list updated!");
//! }
//! ```

mod error;
mod extract;
mod metadata;

pub mod charset;
pub mod config;
pub mod label;
pub mod remote;
pub mod scan;
pub mod scheme;
pub mod suffix;

// Re-export core types
pub use error::{Error, Result};
pub use extract::{extract_bytes_with_trie, extract_with_trie, ExtractResult, Extractor};

// Re-export configuration
pub use config::{ExtractOptions, ExtractorConfig, SuffixListSource, DEFAULT_SUFFIX_LIST_URL};

// Re-export suffix list types
pub use suffix::{SuffixLists, SuffixTrie};

// Re-export parsing helpers
pub use label::{looks_like_ipv4, normalize_separators, to_ascii_host, to_ascii_label};
pub use scheme::scheme_end_index;

// Re-export remote collaborators
pub use metadata::CacheMetadata;
pub use remote::{FetchResponse, Fetcher, HttpFetcher, RemoteSuffixList, SuffixListCache};
