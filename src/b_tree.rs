//! B-tree backend: shallow fan-out ordered map with configurable minimum
//! degree.
//!
//! Every node holds a sorted key array with a parallel value array; internal
//! nodes carry one more child than keys. Insertion descends top-down and
//! preemptively splits any full child it is about to enter, so the leaf
//! insert itself never overflows. Deletion likewise guarantees on the way
//! down that each entered child has at least `t` keys, borrowing through the
//! parent or merging siblings as needed.

use smallvec::SmallVec;

use crate::error::Result;
use crate::map::{Key, OrderedMap, Value};
use crate::raw::{Arena, Handle};

/// Minimum degree used by [`BTreeMap::new`], matching the reference design.
pub const DEFAULT_MIN_DEGREE: usize = 3;

// Inline capacities sized for the default degree; larger degrees spill.
type KeyArray = SmallVec<[Key; 8]>;
type ValueArray = SmallVec<[Value; 8]>;
type ChildArray = SmallVec<[Handle; 9]>;

struct BNode {
    keys: KeyArray,
    vals: ValueArray,
    /// Empty for leaves, `keys.len() + 1` entries for internal nodes.
    children: ChildArray,
    leaf: bool,
}

impl BNode {
    fn new_leaf() -> Self {
        Self {
            keys: SmallVec::new(),
            vals: SmallVec::new(),
            children: SmallVec::new(),
            leaf: true,
        }
    }

    fn new_internal() -> Self {
        Self {
            keys: SmallVec::new(),
            vals: SmallVec::new(),
            children: SmallVec::new(),
            leaf: false,
        }
    }

    /// Index of the first key `>= key`; `keys.len()` when all are smaller.
    /// This doubles as the child index to descend into.
    #[inline]
    fn find_key_index(&self, key: Key) -> usize {
        match self.keys.binary_search(&key) {
            Ok(idx) | Err(idx) => idx,
        }
    }
}

/// An ordered map backed by a B-tree of minimum degree `t >= 2`.
///
/// Every non-root node holds between `t - 1` and `2t - 1` keys and all
/// leaves sit at the same depth, so lookups cost O(t * log_t n) with a very
/// shallow tree. The empty map is a root leaf with zero keys.
///
/// # Example
///
/// ```
/// use keyspan::BTreeMap;
///
/// let mut map = BTreeMap::with_min_degree(2);
/// for k in 1..=10 {
///     map.insert(k, k).unwrap();
/// }
/// assert_eq!(map.len(), 10);
/// assert!(map.validate());
/// ```
pub struct BTreeMap {
    nodes: Arena<BNode>,
    root: Handle,
    min_degree: usize,
    len: usize,
}

impl BTreeMap {
    /// Creates an empty map with the default minimum degree.
    #[must_use]
    pub fn new() -> Self {
        Self::with_min_degree(DEFAULT_MIN_DEGREE)
    }

    /// Creates an empty map with minimum degree `t`.
    ///
    /// # Panics
    ///
    /// Panics if `t < 2`.
    #[must_use]
    pub fn with_min_degree(t: usize) -> Self {
        assert!(t >= 2, "`BTreeMap::with_min_degree()` - minimum degree must be >= 2");
        let mut nodes = Arena::new();
        let root = nodes.alloc(BNode::new_leaf());
        Self {
            nodes,
            root,
            min_degree: t,
            len: 0,
        }
    }

    /// The minimum degree this map was built with.
    #[must_use]
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Inserts a key-value pair; see [`OrderedMap::insert`].
    pub fn insert(&mut self, key: Key, value: Value) -> Result<Option<Value>> {
        if self.node(self.root).keys.len() == self.max_keys() {
            // Grow upward: graft a fresh root above, then split the old one
            // into it. The sibling is allocated before any key moves.
            let old_root = self.root;
            let new_root = self.nodes.try_alloc(BNode::new_internal())?;
            self.node_mut(new_root).children.push(old_root);
            if let Err(err) = self.split_child(new_root, 0) {
                self.nodes.free(new_root);
                return Err(err);
            }
            self.root = new_root;
        }

        let result = self.insert_non_full(self.root, key, value)?;
        if result.is_none() {
            self.len += 1;
        }
        Ok(result)
    }

    /// Removes `key`, returning its value if present.
    pub fn remove(&mut self, key: Key) -> Option<Value> {
        let removed = self.delete_key(self.root, key)?;
        self.len -= 1;

        // The root may have been drained by a merge directly below it.
        let root = self.root;
        if self.node(root).keys.is_empty() && !self.node(root).leaf {
            let new_root = self.node(root).children[0];
            self.nodes.free(root);
            self.root = new_root;
        }
        Some(removed)
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: Key) -> Option<Value> {
        let mut current = self.root;
        loop {
            let node = self.node(current);
            let idx = node.find_key_index(key);
            if idx < node.keys.len() && node.keys[idx] == key {
                return Some(node.vals[idx]);
            }
            if node.leaf {
                return None;
            }
            current = node.children[idx];
        }
    }

    /// Returns true if the map contains `key`.
    #[must_use]
    pub fn contains(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    /// Smallest key, or `None` when empty.
    #[must_use]
    pub fn min(&self) -> Option<Key> {
        if self.len == 0 {
            return None;
        }
        let mut current = self.root;
        while !self.node(current).leaf {
            current = self.node(current).children[0];
        }
        Some(self.node(current).keys[0])
    }

    /// Largest key, or `None` when empty.
    #[must_use]
    pub fn max(&self) -> Option<Key> {
        if self.len == 0 {
            return None;
        }
        let mut current = self.root;
        while !self.node(current).leaf {
            let node = self.node(current);
            current = node.children[node.keys.len()];
        }
        let node = self.node(current);
        Some(node.keys[node.keys.len() - 1])
    }

    /// Largest stored key `<= key`.
    #[must_use]
    pub fn floor(&self, key: Key) -> Option<Key> {
        let mut current = self.root;
        let mut best = None;
        loop {
            let node = self.node(current);
            let idx = node.find_key_index(key);
            if idx < node.keys.len() && node.keys[idx] == key {
                return Some(key);
            }
            if idx > 0 {
                // Deeper candidates are closer to `key`, so overwriting is safe.
                best = Some(node.keys[idx - 1]);
            }
            if node.leaf {
                return best;
            }
            current = node.children[idx];
        }
    }

    /// Smallest stored key `>= key`.
    #[must_use]
    pub fn ceiling(&self, key: Key) -> Option<Key> {
        let mut current = self.root;
        let mut best = None;
        loop {
            let node = self.node(current);
            let idx = node.find_key_index(key);
            if idx < node.keys.len() && node.keys[idx] == key {
                return Some(key);
            }
            if idx < node.keys.len() {
                best = Some(node.keys[idx]);
            }
            if node.leaf {
                return best;
            }
            current = node.children[idx];
        }
    }

    /// Writes the keys in `[lo, hi]` into `out` in ascending order; returns
    /// the count written. Children whose key window cannot intersect the
    /// query are pruned.
    pub fn range(&self, lo: Key, hi: Key, out: &mut [Key]) -> usize {
        if lo > hi || out.is_empty() {
            return 0;
        }
        let mut count = 0;
        self.range_into(self.root, lo, hi, out, &mut count);
        count
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Releases every node and resets the map to an empty root leaf.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(BNode::new_leaf());
        self.len = 0;
    }

    /// Checks every B-tree invariant: key counts within `[t - 1, 2t - 1]`
    /// (root exempt below), strictly ascending keys partitioned by the
    /// parent separators, and all leaves at equal depth.
    #[must_use]
    pub fn validate(&self) -> bool {
        let mut leaf_depth = None;
        let mut count = 0;
        self.validate_node(self.root, None, None, 0, &mut leaf_depth, &mut count) && count == self.len
    }

    /// Number of levels in the tree; 0 when empty.
    #[must_use]
    pub fn height(&self) -> usize {
        if self.len == 0 {
            return 0;
        }
        let mut height = 1;
        let mut current = self.root;
        while !self.node(current).leaf {
            height += 1;
            current = self.node(current).children[0];
        }
        height
    }

    // ─── Internal helpers ────────────────────────────────────────────────

    #[inline]
    fn node(&self, handle: Handle) -> &BNode {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut BNode {
        self.nodes.get_mut(handle)
    }

    #[inline]
    fn max_keys(&self) -> usize {
        2 * self.min_degree - 1
    }

    /// Splits the full child at `child_idx` of `parent`, lifting the median
    /// into the parent. The new sibling takes the upper `t - 1` keys and the
    /// upper `t` children.
    fn split_child(&mut self, parent: Handle, child_idx: usize) -> Result<()> {
        let t = self.min_degree;
        let child_h = self.node(parent).children[child_idx];
        let child_is_leaf = self.node(child_h).leaf;

        let right_h = self.nodes.try_alloc(if child_is_leaf {
            BNode::new_leaf()
        } else {
            BNode::new_internal()
        })?;

        let child = self.node_mut(child_h);
        let right_keys: KeyArray = child.keys.drain(t..).collect();
        let right_vals: ValueArray = child.vals.drain(t..).collect();
        let right_children: ChildArray = if child_is_leaf {
            SmallVec::new()
        } else {
            child.children.drain(t..).collect()
        };
        let median_key = child.keys.pop().unwrap();
        let median_val = child.vals.pop().unwrap();

        let right = self.node_mut(right_h);
        right.keys = right_keys;
        right.vals = right_vals;
        right.children = right_children;

        let parent_node = self.node_mut(parent);
        parent_node.keys.insert(child_idx, median_key);
        parent_node.vals.insert(child_idx, median_val);
        parent_node.children.insert(child_idx + 1, right_h);
        Ok(())
    }

    fn insert_non_full(&mut self, h: Handle, key: Key, value: Value) -> Result<Option<Value>> {
        let node = self.node(h);
        let idx = node.find_key_index(key);

        if idx < node.keys.len() && node.keys[idx] == key {
            let node = self.node_mut(h);
            let old = node.vals[idx];
            node.vals[idx] = value;
            return Ok(Some(old));
        }

        if node.leaf {
            let node = self.node_mut(h);
            node.keys.insert(idx, key);
            node.vals.insert(idx, value);
            return Ok(None);
        }

        let mut child_idx = idx;
        if self.node(self.node(h).children[child_idx]).keys.len() == self.max_keys() {
            self.split_child(h, child_idx)?;
            // The lifted median now sits at keys[child_idx]; it may be the
            // very key being inserted.
            let median = self.node(h).keys[child_idx];
            if key > median {
                child_idx += 1;
            } else if key == median {
                let node = self.node_mut(h);
                let old = node.vals[child_idx];
                node.vals[child_idx] = value;
                return Ok(Some(old));
            }
        }

        let child = self.node(h).children[child_idx];
        self.insert_non_full(child, key, value)
    }

    fn delete_key(&mut self, h: Handle, key: Key) -> Option<Value> {
        let node = self.node(h);
        let idx = node.find_key_index(key);

        if idx < node.keys.len() && node.keys[idx] == key {
            if node.leaf {
                let node = self.node_mut(h);
                node.keys.remove(idx);
                return Some(node.vals.remove(idx));
            }
            return Some(self.delete_from_internal(h, idx));
        }

        if node.leaf {
            return None;
        }

        let was_last_child = idx == node.keys.len();
        if self.node(node.children[idx]).keys.len() < self.min_degree {
            self.fill_child(h, idx);
        }

        // A merge may have shrunk the key count, shifting the last child.
        let idx = if was_last_child && idx > self.node(h).keys.len() {
            idx - 1
        } else {
            idx
        };
        let child = self.node(h).children[idx];
        self.delete_key(child, key)
    }

    /// Removes the key at `idx` of internal node `h`, replacing it with its
    /// in-order predecessor or successor when a neighbouring subtree has
    /// slack, merging otherwise. Returns the removed value.
    fn delete_from_internal(&mut self, h: Handle, idx: usize) -> Value {
        let t = self.min_degree;
        let key = self.node(h).keys[idx];
        let old_val = self.node(h).vals[idx];
        let left = self.node(h).children[idx];
        let right = self.node(h).children[idx + 1];

        if self.node(left).keys.len() >= t {
            let (pred_key, pred_val) = self.subtree_last(left);
            let node = self.node_mut(h);
            node.keys[idx] = pred_key;
            node.vals[idx] = pred_val;
            let _ = self.delete_key(left, pred_key);
        } else if self.node(right).keys.len() >= t {
            let (succ_key, succ_val) = self.subtree_first(right);
            let node = self.node_mut(h);
            node.keys[idx] = succ_key;
            node.vals[idx] = succ_val;
            let _ = self.delete_key(right, succ_key);
        } else {
            self.merge_children(h, idx);
            let merged = self.node(h).children[idx];
            let _ = self.delete_key(merged, key);
        }
        old_val
    }

    /// Largest entry in the subtree rooted at `h`.
    fn subtree_last(&self, mut h: Handle) -> (Key, Value) {
        loop {
            let node = self.node(h);
            if node.leaf {
                let last = node.keys.len() - 1;
                return (node.keys[last], node.vals[last]);
            }
            h = node.children[node.keys.len()];
        }
    }

    /// Smallest entry in the subtree rooted at `h`.
    fn subtree_first(&self, mut h: Handle) -> (Key, Value) {
        loop {
            let node = self.node(h);
            if node.leaf {
                return (node.keys[0], node.vals[0]);
            }
            h = node.children[0];
        }
    }

    /// Brings the child at `idx` up to `t` keys, borrowing through the
    /// parent from a sibling with slack or merging with one without.
    fn fill_child(&mut self, h: Handle, idx: usize) {
        let t = self.min_degree;
        let key_count = self.node(h).keys.len();

        if idx > 0 && self.node(self.node(h).children[idx - 1]).keys.len() >= t {
            self.borrow_from_left(h, idx);
        } else if idx < key_count && self.node(self.node(h).children[idx + 1]).keys.len() >= t {
            self.borrow_from_right(h, idx);
        } else if idx < key_count {
            self.merge_children(h, idx);
        } else {
            self.merge_children(h, idx - 1);
        }
    }

    /// Rotates one entry from the left sibling through the parent separator.
    fn borrow_from_left(&mut self, h: Handle, idx: usize) {
        let left_h = self.node(h).children[idx - 1];
        let child_h = self.node(h).children[idx];

        let left = self.node_mut(left_h);
        let moved_key = left.keys.pop().unwrap();
        let moved_val = left.vals.pop().unwrap();
        let moved_child = if left.leaf { None } else { left.children.pop() };

        let parent = self.node_mut(h);
        let sep_key = std::mem::replace(&mut parent.keys[idx - 1], moved_key);
        let sep_val = std::mem::replace(&mut parent.vals[idx - 1], moved_val);

        let child = self.node_mut(child_h);
        child.keys.insert(0, sep_key);
        child.vals.insert(0, sep_val);
        if let Some(grandchild) = moved_child {
            child.children.insert(0, grandchild);
        }
    }

    /// Rotates one entry from the right sibling through the parent separator.
    fn borrow_from_right(&mut self, h: Handle, idx: usize) {
        let right_h = self.node(h).children[idx + 1];
        let child_h = self.node(h).children[idx];

        let right = self.node_mut(right_h);
        let moved_key = right.keys.remove(0);
        let moved_val = right.vals.remove(0);
        let moved_child = if right.leaf {
            None
        } else {
            Some(right.children.remove(0))
        };

        let parent = self.node_mut(h);
        let sep_key = std::mem::replace(&mut parent.keys[idx], moved_key);
        let sep_val = std::mem::replace(&mut parent.vals[idx], moved_val);

        let child = self.node_mut(child_h);
        child.keys.push(sep_key);
        child.vals.push(sep_val);
        if let Some(grandchild) = moved_child {
            child.children.push(grandchild);
        }
    }

    /// Merges child `idx`, the separator at `idx`, and child `idx + 1` into
    /// a single node; the right sibling's slot is released.
    fn merge_children(&mut self, h: Handle, idx: usize) {
        let parent = self.node_mut(h);
        let sep_key = parent.keys.remove(idx);
        let sep_val = parent.vals.remove(idx);
        let right_h = parent.children.remove(idx + 1);
        let left_h = parent.children[idx];

        let right = self.nodes.take(right_h);
        let left = self.node_mut(left_h);
        left.keys.push(sep_key);
        left.vals.push(sep_val);
        left.keys.extend(right.keys);
        left.vals.extend(right.vals);
        left.children.extend(right.children);
    }

    fn range_into(&self, h: Handle, lo: Key, hi: Key, out: &mut [Key], count: &mut usize) {
        if *count >= out.len() {
            return;
        }
        let node = self.node(h);
        let key_count = node.keys.len();

        for i in 0..key_count {
            // Child i holds keys strictly between keys[i-1] and keys[i].
            if !node.leaf && node.keys[i] > lo && (i == 0 || node.keys[i - 1] < hi) {
                self.range_into(node.children[i], lo, hi, out, count);
                if *count >= out.len() {
                    return;
                }
            }
            if node.keys[i] > hi {
                return;
            }
            if node.keys[i] >= lo {
                out[*count] = node.keys[i];
                *count += 1;
                if *count >= out.len() {
                    return;
                }
            }
        }

        if !node.leaf && (key_count == 0 || node.keys[key_count - 1] < hi) {
            self.range_into(node.children[key_count], lo, hi, out, count);
        }
    }

    fn validate_node(
        &self,
        h: Handle,
        lower: Option<Key>,
        upper: Option<Key>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        count: &mut usize,
    ) -> bool {
        let node = self.node(h);
        let t = self.min_degree;
        let key_count = node.keys.len();

        if depth > 0 && key_count < t - 1 {
            return false;
        }
        if key_count > self.max_keys() {
            return false;
        }

        for i in 0..key_count {
            let key = node.keys[i];
            if lower.is_some_and(|lo| key <= lo) || upper.is_some_and(|hi| key >= hi) {
                return false;
            }
            if i > 0 && node.keys[i - 1] >= key {
                return false;
            }
        }
        *count += key_count;

        if node.leaf {
            if !node.children.is_empty() {
                return false;
            }
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(expected) if expected != depth => return false,
                Some(_) => {}
            }
            return true;
        }

        if node.children.len() != key_count + 1 {
            return false;
        }
        for i in 0..node.children.len() {
            let child_lower = if i == 0 { lower } else { Some(node.keys[i - 1]) };
            let child_upper = if i == key_count { upper } else { Some(node.keys[i]) };
            if !self.validate_node(node.children[i], child_lower, child_upper, depth + 1, leaf_depth, count) {
                return false;
            }
        }
        true
    }
}

impl Default for BTreeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderedMap for BTreeMap {
    fn insert(&mut self, key: Key, value: Value) -> Result<Option<Value>> {
        BTreeMap::insert(self, key, value)
    }

    fn remove(&mut self, key: Key) -> Option<Value> {
        BTreeMap::remove(self, key)
    }

    fn get(&self, key: Key) -> Option<Value> {
        BTreeMap::get(self, key)
    }

    fn min(&self) -> Option<Key> {
        BTreeMap::min(self)
    }

    fn max(&self) -> Option<Key> {
        BTreeMap::max(self)
    }

    fn floor(&self, key: Key) -> Option<Key> {
        BTreeMap::floor(self, key)
    }

    fn ceiling(&self, key: Key) -> Option<Key> {
        BTreeMap::ceiling(self, key)
    }

    fn range(&self, lo: Key, hi: Key, out: &mut [Key]) -> usize {
        BTreeMap::range(self, lo, hi, out)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn clear(&mut self) {
        BTreeMap::clear(self)
    }

    fn validate(&self) -> bool {
        BTreeMap::validate(self)
    }

    fn height(&self) -> usize {
        BTreeMap::height(self)
    }
}
