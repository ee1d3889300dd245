//! Prefix tree over the lowercase alphabet `a-z`.
//!
//! Words containing anything outside the alphabet are rejected as a
//! sentinel `false`/empty result; no operation errors. Each node tracks how
//! many words live below it, so prefix counting is O(prefix length).

use crate::raw::{Arena, Handle};

const ALPHABET: usize = 26;

struct TrieNode {
    children: [Option<Handle>; ALPHABET],
    terminal: bool,
    /// Number of stored words in this subtree, including this node.
    words_below: usize,
}

impl TrieNode {
    fn new() -> Self {
        Self {
            children: [None; ALPHABET],
            terminal: false,
            words_below: 0,
        }
    }

    fn child_count(&self) -> usize {
        self.children.iter().flatten().count()
    }
}

/// A trie storing lowercase-ASCII words.
///
/// # Example
///
/// ```
/// use keyspan::Trie;
///
/// let mut trie = Trie::new();
/// trie.insert("card");
/// trie.insert("care");
/// assert!(trie.starts_with("car"));
/// assert_eq!(trie.count_prefix("car"), 2);
/// assert!(!trie.insert("Card")); // outside the alphabet
/// ```
pub struct Trie {
    nodes: Arena<TrieNode>,
    root: Handle,
    len: usize,
}

/// Maps a byte to its slot, or `None` outside `a-z`.
fn slot(byte: u8) -> Option<usize> {
    byte.is_ascii_lowercase().then(|| usize::from(byte - b'a'))
}

/// The whole word as slots, or `None` if any byte is out of alphabet.
fn slots(word: &str) -> Option<Vec<usize>> {
    word.bytes().map(slot).collect()
}

impl Trie {
    /// Creates an empty trie.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(TrieNode::new());
        Self { nodes, root, len: 0 }
    }

    /// Adds `word`. Returns true when the word is valid and newly stored;
    /// false for repeats, the empty string, or out-of-alphabet input.
    pub fn insert(&mut self, word: &str) -> bool {
        let Some(path) = slots(word) else {
            return false;
        };
        if path.is_empty() || self.contains(word) {
            return false;
        }

        let mut current = self.root;
        self.nodes.get_mut(current).words_below += 1;
        for idx in path {
            current = match self.nodes.get(current).children[idx] {
                Some(child) => child,
                None => {
                    let child = self.nodes.alloc(TrieNode::new());
                    self.nodes.get_mut(current).children[idx] = Some(child);
                    child
                }
            };
            self.nodes.get_mut(current).words_below += 1;
        }
        self.nodes.get_mut(current).terminal = true;
        self.len += 1;
        true
    }

    /// Returns true if exactly `word` was stored.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        !word.is_empty()
            && self
                .walk(word)
                .is_some_and(|h| self.nodes.get(h).terminal)
    }

    /// Returns true if any stored word starts with `prefix`.
    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.walk(prefix).is_some()
    }

    /// Number of stored words starting with `prefix` (the empty prefix
    /// counts everything).
    #[must_use]
    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.walk(prefix).map_or(0, |h| self.nodes.get(h).words_below)
    }

    /// Removes `word`, pruning branches that no longer lead anywhere.
    /// Returns false if it was not stored (or is invalid).
    pub fn remove(&mut self, word: &str) -> bool {
        if !self.contains(word) {
            return false;
        }
        let path = slots(word).expect("`Trie::remove()` - contains() accepted the word");

        // Collect the handle chain root -> last node of the word.
        let mut chain = Vec::with_capacity(path.len() + 1);
        let mut current = self.root;
        chain.push(current);
        for &idx in &path {
            current = self.nodes.get(current).children[idx].expect("`Trie::remove()` - walk broke mid-word");
            chain.push(current);
        }

        self.nodes.get_mut(current).terminal = false;
        for &h in &chain {
            self.nodes.get_mut(h).words_below -= 1;
        }

        // Prune childless, non-terminal tail nodes.
        for depth in (1..chain.len()).rev() {
            let node = self.nodes.get(chain[depth]);
            if node.terminal || node.child_count() > 0 {
                break;
            }
            self.nodes.free(chain[depth]);
            self.nodes.get_mut(chain[depth - 1]).children[path[depth - 1]] = None;
        }

        self.len -= 1;
        true
    }

    /// Up to `max_results` stored words starting with `prefix`, in
    /// lexicographic order.
    #[must_use]
    pub fn autocomplete(&self, prefix: &str, max_results: usize) -> Vec<String> {
        let mut results = Vec::new();
        let Some(start) = self.walk(prefix) else {
            return results;
        };
        let mut buffer = prefix.to_owned();
        self.collect_words(start, &mut buffer, max_results, &mut results);
        results
    }

    /// Longest prefix shared by every stored word; empty when the trie is
    /// empty or words diverge at the root.
    #[must_use]
    pub fn longest_common_prefix(&self) -> String {
        let mut prefix = String::new();
        if self.len == 0 {
            return prefix;
        }
        let mut current = self.root;
        loop {
            let node = self.nodes.get(current);
            if node.terminal || node.child_count() != 1 {
                return prefix;
            }
            let idx = node
                .children
                .iter()
                .position(Option::is_some)
                .expect("`Trie::longest_common_prefix()` - child_count was 1");
            prefix.push((b'a' + u8::try_from(idx).unwrap()) as char);
            current = node.children[idx].unwrap();
        }
    }

    /// Number of stored words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when no words are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every word.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(TrieNode::new());
        self.len = 0;
    }

    // ─── Internal helpers ────────────────────────────────────────────────

    /// Follows `prefix` from the root; `None` on a missing edge or invalid
    /// input.
    fn walk(&self, prefix: &str) -> Option<Handle> {
        let mut current = self.root;
        for byte in prefix.bytes() {
            let idx = slot(byte)?;
            current = self.nodes.get(current).children[idx]?;
        }
        Some(current)
    }

    fn collect_words(&self, h: Handle, buffer: &mut String, max_results: usize, results: &mut Vec<String>) {
        if results.len() >= max_results {
            return;
        }
        let node = self.nodes.get(h);
        if node.terminal {
            results.push(buffer.clone());
        }
        for (idx, child) in node.children.iter().enumerate() {
            let Some(child) = child else { continue };
            buffer.push((b'a' + u8::try_from(idx).unwrap()) as char);
            self.collect_words(*child, buffer, max_results, results);
            buffer.pop();
            if results.len() >= max_results {
                return;
            }
        }
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_contains_remove() {
        let mut trie = Trie::new();
        assert!(trie.insert("apple"));
        assert!(!trie.insert("apple"));
        assert!(trie.insert("app"));
        assert_eq!(trie.len(), 2);

        assert!(trie.contains("apple"));
        assert!(trie.contains("app"));
        assert!(!trie.contains("ap"));

        assert!(trie.remove("apple"));
        assert!(!trie.remove("apple"));
        assert!(trie.contains("app"));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn alphabet_is_enforced() {
        let mut trie = Trie::new();
        assert!(!trie.insert("Hello"));
        assert!(!trie.insert("abc1"));
        assert!(!trie.insert(""));
        assert!(trie.is_empty());
        assert!(!trie.contains("Hello"));
        assert!(!trie.starts_with("He"));
    }

    #[test]
    fn prefix_queries() {
        let mut trie = Trie::new();
        for word in ["car", "card", "care", "dog"] {
            trie.insert(word);
        }
        assert!(trie.starts_with("car"));
        assert!(!trie.starts_with("cat"));
        assert_eq!(trie.count_prefix("car"), 3);
        assert_eq!(trie.count_prefix("card"), 1);
        assert_eq!(trie.count_prefix(""), 4);
        assert_eq!(trie.count_prefix("x"), 0);
    }

    #[test]
    fn prefix_counts_survive_removal() {
        let mut trie = Trie::new();
        trie.insert("car");
        trie.insert("card");
        trie.remove("card");
        assert_eq!(trie.count_prefix("car"), 1);
        assert!(!trie.starts_with("card"));
    }

    #[test]
    fn autocompletion_is_sorted_and_capped() {
        let mut trie = Trie::new();
        for word in ["cat", "car", "card", "dog", "cab"] {
            trie.insert(word);
        }
        assert_eq!(trie.autocomplete("ca", 10), ["cab", "car", "card", "cat"]);
        assert_eq!(trie.autocomplete("ca", 2), ["cab", "car"]);
        assert!(trie.autocomplete("z", 10).is_empty());
    }

    #[test]
    fn common_prefix() {
        let mut trie = Trie::new();
        assert_eq!(trie.longest_common_prefix(), "");
        trie.insert("flower");
        assert_eq!(trie.longest_common_prefix(), "flower");
        trie.insert("flow");
        assert_eq!(trie.longest_common_prefix(), "flow");
        trie.insert("dog");
        assert_eq!(trie.longest_common_prefix(), "");
    }

    #[test]
    fn clear_empties() {
        let mut trie = Trie::new();
        trie.insert("abc");
        trie.clear();
        assert!(trie.is_empty());
        assert!(!trie.contains("abc"));
        assert!(trie.insert("abc"));
    }
}
