//! Skip-list backend: probabilistic O(log n) expected ordered map.
//!
//! Each node carries a tower of forward pointers whose height is drawn from
//! a geometric distribution at insertion time. The level-0 chain threads
//! every live node in ascending key order; each higher chain is a sparser
//! express lane over the one below. Randomness is a per-instance component:
//! the generator is seedable at construction so behavior is a function of
//! (operations, seed), never of process-global state.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use smallvec::{SmallVec, smallvec};

use crate::error::Result;
use crate::map::{Key, OrderedMap, Value};
use crate::raw::{Arena, Handle};

/// Tower height ceiling; supports roughly 2^32 elements at p = 0.5.
const MAX_LEVEL: usize = 32;

/// Branching probability used by [`SkipListMap::new`].
pub const DEFAULT_PROBABILITY: f64 = 0.5;

struct SkipNode {
    key: Key,
    value: Value,
    /// One forward pointer per level this node participates in; the tower
    /// height is `forward.len()`.
    forward: SmallVec<[Option<Handle>; 4]>,
}

/// An ordered map backed by a skip list.
///
/// # Example
///
/// ```
/// use keyspan::SkipListMap;
///
/// let mut map = SkipListMap::with_seed(0.5, 42);
/// for k in [5, 1, 9] {
///     map.insert(k, k * 100).unwrap();
/// }
/// assert_eq!(map.min(), Some(1));
/// assert_eq!(map.ceiling(6), Some(9));
/// ```
pub struct SkipListMap {
    nodes: Arena<SkipNode>,
    /// Header tower at maximum level; the entry point of every descent.
    head: Handle,
    /// Highest level currently in use (>= 1 even when empty).
    level: usize,
    len: usize,
    prob: f64,
    rng: SmallRng,
}

impl SkipListMap {
    /// Creates an empty map with branching probability 0.5 and an
    /// entropy-seeded generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(DEFAULT_PROBABILITY, SmallRng::from_entropy())
    }

    /// Creates an empty map with the given branching probability.
    ///
    /// # Panics
    ///
    /// Panics unless `0.0 < prob < 1.0`.
    #[must_use]
    pub fn with_probability(prob: f64) -> Self {
        Self::with_rng(prob, SmallRng::from_entropy())
    }

    /// Creates an empty map whose level generator is seeded with `seed`,
    /// making tower heights fully reproducible.
    #[must_use]
    pub fn with_seed(prob: f64, seed: u64) -> Self {
        Self::with_rng(prob, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(prob: f64, rng: SmallRng) -> Self {
        assert!(
            prob > 0.0 && prob < 1.0,
            "`SkipListMap` - branching probability must lie in (0, 1)"
        );
        let mut nodes = Arena::new();
        let head = nodes.alloc(SkipNode {
            key: 0,
            value: 0,
            forward: smallvec![None; MAX_LEVEL],
        });
        Self {
            nodes,
            head,
            level: 1,
            len: 0,
            prob,
            rng,
        }
    }

    /// Inserts a key-value pair; see [`OrderedMap::insert`].
    pub fn insert(&mut self, key: Key, value: Value) -> Result<Option<Value>> {
        let mut update = [self.head; MAX_LEVEL];
        let mut current = self.head;
        for lvl in (0..self.level).rev() {
            while let Some(next) = self.forward(current, lvl) {
                if self.nodes.get(next).key < key {
                    current = next;
                } else {
                    break;
                }
            }
            update[lvl] = current;
        }

        if let Some(found) = self.forward(current, 0)
            && self.nodes.get(found).key == key
        {
            let node = self.nodes.get_mut(found);
            let old = node.value;
            node.value = value;
            return Ok(Some(old));
        }

        // The generator is consumed only for genuinely new keys.
        let height = self.random_level();
        let new = self.nodes.try_alloc(SkipNode {
            key,
            value,
            forward: smallvec![None; height],
        })?;

        if height > self.level {
            for slot in update.iter_mut().take(height).skip(self.level) {
                *slot = self.head;
            }
            self.level = height;
        }

        for lvl in 0..height {
            let next = self.forward(update[lvl], lvl);
            self.nodes.get_mut(new).forward[lvl] = next;
            self.nodes.get_mut(update[lvl]).forward[lvl] = Some(new);
        }
        self.len += 1;
        Ok(None)
    }

    /// Removes `key`, returning its value if present.
    pub fn remove(&mut self, key: Key) -> Option<Value> {
        let mut update = [self.head; MAX_LEVEL];
        let mut current = self.head;
        for lvl in (0..self.level).rev() {
            while let Some(next) = self.forward(current, lvl) {
                if self.nodes.get(next).key < key {
                    current = next;
                } else {
                    break;
                }
            }
            update[lvl] = current;
        }

        let target = self.forward(current, 0)?;
        if self.nodes.get(target).key != key {
            return None;
        }

        for lvl in 0..self.level {
            if self.forward(update[lvl], lvl) != Some(target) {
                break;
            }
            let next = self.nodes.get(target).forward[lvl];
            self.nodes.get_mut(update[lvl]).forward[lvl] = next;
        }

        let removed = self.nodes.take(target);
        while self.level > 1 && self.forward(self.head, self.level - 1).is_none() {
            self.level -= 1;
        }
        self.len -= 1;
        Some(removed.value)
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: Key) -> Option<Value> {
        let mut current = self.head;
        for lvl in (0..self.level).rev() {
            while let Some(next) = self.forward(current, lvl) {
                if self.nodes.get(next).key < key {
                    current = next;
                } else {
                    break;
                }
            }
        }
        let candidate = self.forward(current, 0)?;
        let node = self.nodes.get(candidate);
        (node.key == key).then_some(node.value)
    }

    /// Returns true if the map contains `key`.
    #[must_use]
    pub fn contains(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    /// Smallest key, or `None` when empty.
    #[must_use]
    pub fn min(&self) -> Option<Key> {
        let first = self.forward(self.head, 0)?;
        Some(self.nodes.get(first).key)
    }

    /// Largest key, or `None` when empty.
    #[must_use]
    pub fn max(&self) -> Option<Key> {
        let mut current = self.head;
        for lvl in (0..self.level).rev() {
            while let Some(next) = self.forward(current, lvl) {
                current = next;
            }
        }
        (current != self.head).then(|| self.nodes.get(current).key)
    }

    /// Largest stored key `<= key`.
    #[must_use]
    pub fn floor(&self, key: Key) -> Option<Key> {
        let mut current = self.head;
        for lvl in (0..self.level).rev() {
            while let Some(next) = self.forward(current, lvl) {
                if self.nodes.get(next).key <= key {
                    current = next;
                } else {
                    break;
                }
            }
        }
        (current != self.head).then(|| self.nodes.get(current).key)
    }

    /// Smallest stored key `>= key`.
    #[must_use]
    pub fn ceiling(&self, key: Key) -> Option<Key> {
        let mut current = self.head;
        for lvl in (0..self.level).rev() {
            while let Some(next) = self.forward(current, lvl) {
                if self.nodes.get(next).key < key {
                    current = next;
                } else {
                    break;
                }
            }
        }
        let candidate = self.forward(current, 0)?;
        Some(self.nodes.get(candidate).key)
    }

    /// Writes the keys in `[lo, hi]` into `out` in ascending order; returns
    /// the count written. Locates the first key `>= lo` by descent, then
    /// follows the level-0 chain.
    pub fn range(&self, lo: Key, hi: Key, out: &mut [Key]) -> usize {
        if lo > hi || out.is_empty() {
            return 0;
        }
        let mut current = self.head;
        for lvl in (0..self.level).rev() {
            while let Some(next) = self.forward(current, lvl) {
                if self.nodes.get(next).key < lo {
                    current = next;
                } else {
                    break;
                }
            }
        }

        let mut count = 0;
        let mut cursor = self.forward(current, 0);
        while let Some(h) = cursor {
            let node = self.nodes.get(h);
            if node.key > hi || count >= out.len() {
                break;
            }
            out[count] = node.key;
            count += 1;
            cursor = node.forward[0];
        }
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

    /// Releases every node and resets the header tower. The generator keeps
    /// its state.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = self.nodes.alloc(SkipNode {
            key: 0,
            value: 0,
            forward: smallvec![None; MAX_LEVEL],
        });
        self.level = 1;
        self.len = 0;
    }

    /// Checks every skip-list invariant: the level-0 chain is strictly
    /// ascending and threads exactly `len` nodes, every higher chain is a
    /// sorted subset of the one below, towers are tall enough for each chain
    /// they appear in, and no chain exists above the current level.
    #[must_use]
    pub fn validate(&self) -> bool {
        if self.level == 0 || self.level > MAX_LEVEL {
            return false;
        }
        // Nothing may dangle above the current level.
        for lvl in self.level..MAX_LEVEL {
            if self.forward(self.head, lvl).is_some() {
                return false;
            }
        }

        // Level 0 threads every node in ascending order.
        let mut count = 0;
        let mut last_key = None;
        let mut cursor = self.forward(self.head, 0);
        while let Some(h) = cursor {
            let node = self.nodes.get(h);
            if node.forward.is_empty() || node.forward.len() > MAX_LEVEL {
                return false;
            }
            if last_key.is_some_and(|k| k >= node.key) {
                return false;
            }
            last_key = Some(node.key);
            count += 1;
            cursor = node.forward[0];
        }
        if count != self.len {
            return false;
        }

        // Each express lane is sorted and a subset of the lane below.
        for lvl in 1..self.level {
            let mut below: Vec<Key> = Vec::new();
            let mut cursor = self.forward(self.head, lvl - 1);
            while let Some(h) = cursor {
                let node = self.nodes.get(h);
                below.push(node.key);
                cursor = node.forward[lvl - 1];
            }

            let mut last_key = None;
            let mut cursor = self.forward(self.head, lvl);
            while let Some(h) = cursor {
                let node = self.nodes.get(h);
                if node.forward.len() <= lvl {
                    return false;
                }
                if last_key.is_some_and(|k| k >= node.key) {
                    return false;
                }
                if below.binary_search(&node.key).is_err() {
                    return false;
                }
                last_key = Some(node.key);
                cursor = node.forward[lvl];
            }
        }
        true
    }

    /// Current number of levels in use; 0 when empty.
    #[must_use]
    pub fn height(&self) -> usize {
        if self.len == 0 { 0 } else { self.level }
    }

    // ─── Internal helpers ────────────────────────────────────────────────

    #[inline]
    fn forward(&self, h: Handle, lvl: usize) -> Option<Handle> {
        self.nodes.get(h).forward[lvl]
    }

    /// Samples a tower height: repeated Bernoulli(p) trials capped at
    /// [`MAX_LEVEL`], yielding a geometric distribution.
    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < MAX_LEVEL && self.rng.gen_bool(self.prob) {
            level += 1;
        }
        level
    }
}

impl Default for SkipListMap {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderedMap for SkipListMap {
    fn insert(&mut self, key: Key, value: Value) -> Result<Option<Value>> {
        SkipListMap::insert(self, key, value)
    }

    fn remove(&mut self, key: Key) -> Option<Value> {
        SkipListMap::remove(self, key)
    }

    fn get(&self, key: Key) -> Option<Value> {
        SkipListMap::get(self, key)
    }

    fn min(&self) -> Option<Key> {
        SkipListMap::min(self)
    }

    fn max(&self) -> Option<Key> {
        SkipListMap::max(self)
    }

    fn floor(&self, key: Key) -> Option<Key> {
        SkipListMap::floor(self, key)
    }

    fn ceiling(&self, key: Key) -> Option<Key> {
        SkipListMap::ceiling(self, key)
    }

    fn range(&self, lo: Key, hi: Key, out: &mut [Key]) -> usize {
        SkipListMap::range(self, lo, hi, out)
    }

    fn len(&self) -> usize {
        SkipListMap::len(self)
    }

    fn clear(&mut self) {
        SkipListMap::clear(self)
    }

    fn validate(&self) -> bool {
        SkipListMap::validate(self)
    }

    fn height(&self) -> usize {
        SkipListMap::height(self)
    }
}
