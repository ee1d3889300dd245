use crate::error::Result;

/// Key type stored by every map backend. Keys are unique within a map and
/// ordered by their integer value.
pub type Key = i32;

/// Value type stored by every map backend; an opaque payload.
pub type Value = i32;

/// The contract shared by the three ordered-map backends.
///
/// For any interleaved sequence of operations, `get`, `range`, `min`, `max`,
/// `floor`, and `ceiling` produce identical results on [`RbTreeMap`],
/// [`BTreeMap`], and [`SkipListMap`]; internal traversal orders and
/// `height()` may differ.
///
/// [`RbTreeMap`]: crate::RbTreeMap
/// [`BTreeMap`]: crate::BTreeMap
/// [`SkipListMap`]: crate::SkipListMap
pub trait OrderedMap {
    /// Inserts a key-value pair, overwriting the value for an existing key.
    ///
    /// Returns `Ok(None)` when a new entry was inserted (size grew) and
    /// `Ok(Some(old))` when an existing entry was updated. Fails only with
    /// [`Error::AllocationFailure`], in which case the map is unchanged.
    ///
    /// [`Error::AllocationFailure`]: crate::Error::AllocationFailure
    fn insert(&mut self, key: Key, value: Value) -> Result<Option<Value>>;

    /// Removes the entry for `key`, returning its value, or `None` if the
    /// key was absent. Never allocates.
    fn remove(&mut self, key: Key) -> Option<Value>;

    /// Returns the value stored under `key`, or `None`. Pure; absence is
    /// not an error.
    fn get(&self, key: Key) -> Option<Value>;

    /// Returns true if the map contains `key`.
    fn contains(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    /// Smallest key in the map, or `None` when empty.
    fn min(&self) -> Option<Key>;

    /// Largest key in the map, or `None` when empty.
    fn max(&self) -> Option<Key>;

    /// Largest stored key `<= key`, or `None` if every key is greater.
    fn floor(&self, key: Key) -> Option<Key>;

    /// Smallest stored key `>= key`, or `None` if every key is smaller.
    fn ceiling(&self, key: Key) -> Option<Key>;

    /// Writes the keys in `[lo, hi]` in ascending order into `out`, up to
    /// its capacity, and returns how many were written. Returns 0 when
    /// `lo > hi`. The map must not be mutated while enumerating.
    fn range(&self, lo: Key, hi: Key, out: &mut [Key]) -> usize;

    /// Number of live entries.
    fn len(&self) -> usize;

    /// Returns true if the map holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Releases every node and resets backend metadata.
    fn clear(&mut self);

    /// Read-only self-check: walks the whole structure and verifies every
    /// backend invariant. Intended for tests; returns false on corruption.
    fn validate(&self) -> bool;

    /// Structural height of the backend (levels for the skip list). 0 when
    /// empty.
    fn height(&self) -> usize;
}
