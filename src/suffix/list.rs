//! Public suffix list text parser.

use crate::{Error, Result};

const BEGIN_ICANN: &str = "===BEGIN ICANN DOMAINS===";
const END_ICANN: &str = "===END ICANN DOMAINS===";
const BEGIN_PRIVATE: &str = "===BEGIN PRIVATE DOMAINS===";
const END_PRIVATE: &str = "===END PRIVATE DOMAINS===";

/// Section a rule was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Icann,
    Private,
}

/// Rules of a public suffix list, split by section.
///
/// Rules outside any section marker count as ICANN rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuffixLists {
    pub icann: Vec<String>,
    pub private: Vec<String>,
}

impl SuffixLists {
    /// Parse suffix list text.
    ///
    /// Blank lines and `//` comments are skipped. Only the first
    /// whitespace-separated token of a rule line is used.
    pub fn parse(text: &str) -> Self {
        let mut lists = Self::default();
        let mut section = Section::Icann;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(comment) = line.strip_prefix("//") {
                if comment.contains(BEGIN_PRIVATE) {
                    section = Section::Private;
                } else if comment.contains(BEGIN_ICANN)
                    || comment.contains(END_PRIVATE)
                    || comment.contains(END_ICANN)
                {
                    section = Section::Icann;
                }
                continue;
            }

            let rule = match line.split_whitespace().next() {
                Some(r) => r.to_string(),
                None => continue,
            };
            match section {
                Section::Icann => lists.icann.push(rule),
                Section::Private => lists.private.push(rule),
            }
        }

        lists
    }

    /// Decode and parse raw suffix list bytes.
    ///
    /// Fails if the bytes are not UTF-8 or contain no rules.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::InvalidSuffixList(format!("not UTF-8: {}", e)))?;
        let lists = Self::parse(text);
        if lists.is_empty() {
            return Err(Error::InvalidSuffixList("no rules found".to_string()));
        }
        Ok(lists)
    }

    /// ICANN rules followed by private rules.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.icann.iter().chain(self.private.iter()).map(String::as_str)
    }

    /// Rules to build a trie from.
    pub fn rules(&self, include_private: bool) -> Box<dyn Iterator<Item = &str> + '_> {
        if include_private {
            Box::new(self.all())
        } else {
            Box::new(self.icann.iter().map(String::as_str))
        }
    }

    pub fn len(&self) -> usize {
        self.icann.len() + self.private.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icann.is_empty() && self.private.is_empty()
    }
}
