//! Suffix trie keyed by reversed domain labels.
//!
//! Nodes live in a flat arena and refer to their children by index. The
//! root is node 0 and has no label; a path from the root spells a suffix
//! from the TLD inward.

use ahash::AHashMap;
use std::borrow::Cow;

use super::list::SuffixLists;
use crate::label::to_ascii_host;

type NodeId = u32;

const ROOT: NodeId = 0;

#[derive(Debug, Default)]
struct Node {
    /// Explicit children by label (lowercase)
    children: AHashMap<Box<str>, NodeId>,
    /// Child matching any label not listed in `children`
    wildcard: Option<NodeId>,
    /// A rule ends here
    is_end: bool,
    /// An exception rule ends here
    is_exception: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    Plain,
    Wildcard,
    Exception,
}

/// Immutable-after-build public suffix trie.
///
/// # Examples
/// ```
/// use hostsplit::SuffixTrie;
///
/// let trie = SuffixTrie::from_rules(["ac", "com.ac", "*.ck", "!www.ck"]);
/// assert_eq!(trie.public_suffix("example.ac"), "ac");
/// assert_eq!(trie.public_suffix("foo.bar.ck"), "bar.ck");
/// assert_eq!(trie.public_suffix("www.ck"), "ck");
/// ```
#[derive(Debug)]
pub struct SuffixTrie {
    nodes: Vec<Node>,
    rules: usize,
}

impl Default for SuffixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl SuffixTrie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            rules: 0,
        }
    }

    /// Build a trie from individual rules.
    pub fn from_rules<'a, I>(rules: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut trie = Self::new();
        for rule in rules {
            trie.insert(rule);
        }
        trie
    }

    /// Build a trie from parsed suffix lists.
    ///
    /// Private rules are only included when `include_private` is set.
    pub fn from_lists(lists: &SuffixLists, include_private: bool) -> Self {
        Self::from_rules(lists.rules(include_private))
    }

    /// Number of rules inserted.
    pub fn len(&self) -> usize {
        self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules == 0
    }

    /// Number of nodes in the arena, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Insert one rule in public suffix list syntax.
    ///
    /// `!` marks an exception, `*.` a wildcard. Non-ASCII rules are also
    /// inserted in punycode form.
    pub fn insert(&mut self, rule: &str) {
        let rule = rule.trim();
        let (kind, body) = if let Some(body) = rule.strip_prefix('!') {
            (RuleKind::Exception, body)
        } else if let Some(body) = rule.strip_prefix("*.") {
            (RuleKind::Wildcard, body)
        } else if rule == "*" {
            (RuleKind::Wildcard, "")
        } else {
            (RuleKind::Plain, rule)
        };

        if body.is_empty() && kind != RuleKind::Wildcard {
            return;
        }

        self.insert_labels(kind, &body.to_ascii_lowercase());
        if !body.is_ascii() {
            match to_ascii_host(body) {
                Ok(ascii) => self.insert_labels(kind, &ascii.to_ascii_lowercase()),
                Err(e) => log::debug!("Skipping punycode form of rule {:?}: {}", rule, e),
            }
        }
        self.rules += 1;
    }

    fn insert_labels(&mut self, kind: RuleKind, body: &str) {
        let mut node = ROOT;
        if !body.is_empty() {
            for label in body.rsplit('.') {
                node = self.child_or_insert(node, label);
            }
        }

        match kind {
            RuleKind::Plain => self.nodes[node as usize].is_end = true,
            RuleKind::Exception => self.nodes[node as usize].is_exception = true,
            RuleKind::Wildcard => {
                if self.nodes[node as usize].wildcard.is_none() {
                    let id = self.push(Node {
                        is_end: true,
                        ..Node::default()
                    });
                    self.nodes[node as usize].wildcard = Some(id);
                }
            }
        }
    }

    fn child_or_insert(&mut self, parent: NodeId, label: &str) -> NodeId {
        if let Some(&id) = self.nodes[parent as usize].children.get(label) {
            return id;
        }
        let id = self.push(Node::default());
        self.nodes[parent as usize].children.insert(label.into(), id);
        id
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    /// Count how many of the rightmost `labels` form the public suffix.
    ///
    /// Labels are walked from the TLD inward. An exact child wins over the
    /// wildcard, and an exception child ends the suffix at its parent. The
    /// walk stops at the first empty label.
    pub fn match_labels(&self, labels: &[&str]) -> usize {
        let mut node = &self.nodes[ROOT as usize];
        let mut matched = 0;

        for (depth, label) in labels.iter().rev().enumerate() {
            // no rule spans an empty label
            if label.is_empty() {
                break;
            }
            let key = lowercase(label);
            if let Some(&id) = node.children.get(&*key) {
                let child = &self.nodes[id as usize];
                if child.is_exception {
                    return depth;
                }
                if child.is_end || node.wildcard.is_some() {
                    matched = depth + 1;
                }
                node = child;
                continue;
            }

            match node.wildcard {
                Some(id) => {
                    matched = depth + 1;
                    node = &self.nodes[id as usize];
                }
                None => break,
            }
        }

        matched
    }

    /// Public suffix of a dot-separated host, or `""` if no rule applies.
    pub fn public_suffix<'a>(&self, host: &'a str) -> &'a str {
        let labels: Vec<&str> = host.split('.').collect();
        let n = self.match_labels(&labels);
        if n == 0 {
            return "";
        }
        let skip: usize = labels[..labels.len() - n].iter().map(|l| l.len() + 1).sum();
        &host[skip..]
    }
}

fn lowercase(label: &str) -> Cow<'_, str> {
    if label.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(label.to_ascii_lowercase())
    } else {
        Cow::Borrowed(label)
    }
}
