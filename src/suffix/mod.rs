//! Public suffix list parsing and matching.
//!
//! Text is parsed into [`SuffixLists`] (ICANN and private sections), from
//! which a [`SuffixTrie`] is built once and then only read.

mod list;
mod trie;

pub use list::{Section, SuffixLists};
pub use trie::SuffixTrie;
