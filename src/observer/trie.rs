//! A binary trie mirroring the node's known peer membership, for the
//! `show_node_view` diagnostic RPC.
//!
//! Internally this just tracks the set of live leaf KIDs; a removal
//! "rebuilds" the trie by construction, since the render pass always walks
//! the current leaf set rather than mutating stale internal nodes.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::domain::entities::{format_bid, Kid};

pub struct NodeViewTrie {
    depth: usize,
    leaves: BTreeSet<Kid>,
}

impl NodeViewTrie {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            leaves: BTreeSet::new(),
        }
    }

    pub fn add(&mut self, kid: Kid) {
        self.leaves.insert(kid);
    }

    pub fn remove(&mut self, kid: Kid) {
        self.leaves.remove(&kid);
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Render the trie as one indented line per branch point, with leaves
    /// shown as their full BID.
    pub fn render(&self) -> String {
        let bids: Vec<String> = self
            .leaves
            .iter()
            .map(|&kid| format_bid(kid, self.depth))
            .collect();
        let mut out = String::new();
        render_node(&bids, "", &mut out);
        if out.is_empty() {
            out.push_str("(empty)\n");
        }
        out
    }
}

fn render_node(bids: &[String], prefix: &str, out: &mut String) {
    if bids.len() == 1 {
        let _ = writeln!(out, "{}{}", "  ".repeat(prefix.len()), bids[0]);
        return;
    }
    let zeros: Vec<String> = bids
        .iter()
        .filter(|b| b.as_bytes().get(prefix.len()) == Some(&b'0'))
        .cloned()
        .collect();
    let ones: Vec<String> = bids
        .iter()
        .filter(|b| b.as_bytes().get(prefix.len()) == Some(&b'1'))
        .cloned()
        .collect();
    if !zeros.is_empty() {
        let _ = writeln!(out, "{}{}0", "  ".repeat(prefix.len()), prefix);
        render_node(&zeros, &format!("{prefix}0"), out);
    }
    if !ones.is_empty() {
        let _ = writeln!(out, "{}{}1", "  ".repeat(prefix.len()), prefix);
        render_node(&ones, &format!("{prefix}1"), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_remove_leaves_trie_empty() {
        let mut trie = NodeViewTrie::new(4);
        trie.add(0b1010);
        assert_eq!(trie.len(), 1);
        trie.remove(0b1010);
        assert!(trie.is_empty());
    }

    #[test]
    fn render_lists_every_leaf() {
        let mut trie = NodeViewTrie::new(4);
        trie.add(0b0001);
        trie.add(0b1000);
        let rendered = trie.render();
        assert!(rendered.contains("0001"));
        assert!(rendered.contains("1000"));
    }
}
