//! Bounded map composing two eviction policies: time-based expiry first,
//! then LRU.
//!
//! Entries live simultaneously in a chained hash bucket array (lookup) and a
//! doubly linked recency list bounded by head/tail sentinels (eviction
//! order, oldest at the head end). Both views always hold exactly the same
//! set. The arena is the single owner of every entry, the recency list being
//! the canonical traversal; buckets hold non-owning handles, so each entry
//! is released exactly once.
//!
//! Expiry is entirely lazy: an expired entry is removed by whichever
//! operation observes it, or by an explicit [`TtlCache::cleanup`]. There are
//! no timers and no background work. The clock is injected at construction
//! so tests can advance time deterministically.

use crate::error::Result;
use crate::map::{Key, Value};
use crate::raw::{Arena, Handle};
use crate::util::mix32;

const INITIAL_BUCKETS: usize = 16;
const LOAD_FACTOR: f64 = 0.75;

struct CacheEntry {
    key: Key,
    value: Value,
    /// Absolute expiration timestamp in clock seconds.
    expires_at: f64,
    prev: Handle,
    next: Handle,
    hash_next: Option<Handle>,
}

/// A bounded key-value cache with per-entry TTL and LRU eviction.
///
/// # Example
///
/// ```
/// use keyspan::TtlCache;
///
/// let mut cache = TtlCache::new(2, 60.0);
/// cache.put(1, 10).unwrap();
/// cache.put(2, 20).unwrap();
/// cache.get(1); // 1 is now most recently used
/// cache.put(3, 30).unwrap(); // evicts 2
/// assert_eq!(cache.get(2), None);
/// assert_eq!(cache.get(1), Some(10));
/// ```
pub struct TtlCache {
    entries: Arena<CacheEntry>,
    /// Heads of the hash chains; length fixed at construction.
    buckets: Vec<Option<Handle>>,
    /// Recency-list sentinels: `head` borders the least recently used
    /// entry, `tail` the most recently used.
    head: Handle,
    tail: Handle,
    capacity: usize,
    default_ttl: f64,
    len: usize,
    clock: Box<dyn Fn() -> f64>,
}

fn system_clock() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

impl TtlCache {
    /// Creates a cache holding at most `capacity` entries, each expiring
    /// `default_ttl` seconds after its last `put` or `refresh`. Reads the
    /// system clock.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    #[must_use]
    pub fn new(capacity: usize, default_ttl: f64) -> Self {
        Self::with_clock(capacity, default_ttl, system_clock)
    }

    /// Creates a cache that reads time from `clock`, a function returning
    /// monotonic seconds. All expiry decisions go through it.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    #[must_use]
    pub fn with_clock(capacity: usize, default_ttl: f64, clock: impl Fn() -> f64 + 'static) -> Self {
        assert!(capacity > 0, "`TtlCache` - capacity must be at least 1");

        // Fixed bucket array sized for a load factor of at most 0.75.
        let mut num_buckets = INITIAL_BUCKETS;
        while capacity as f64 / num_buckets as f64 > LOAD_FACTOR {
            num_buckets *= 2;
        }

        let mut entries = Arena::new();
        let (head, tail) = Self::alloc_sentinels(&mut entries);

        Self {
            entries,
            buckets: vec![None; num_buckets],
            head,
            tail,
            capacity,
            default_ttl,
            len: 0,
            clock: Box::new(clock),
        }
    }

    /// Returns the value for `key` and marks it most recently used. An
    /// entry past its expiration is removed and reported absent.
    pub fn get(&mut self, key: Key) -> Option<Value> {
        let h = self.find(key)?;
        if self.is_expired(h) {
            self.remove_entry(h);
            return None;
        }
        self.touch(h);
        Some(self.entries.get(h).value)
    }

    /// Inserts or updates `key` with the default TTL. Returns `Ok(true)`
    /// for a new entry, `Ok(false)` for an update.
    pub fn put(&mut self, key: Key, value: Value) -> Result<bool> {
        self.put_with_ttl(key, value, self.default_ttl)
    }

    /// Inserts or updates `key` with a custom TTL.
    ///
    /// Updating an existing key resets its expiration and recency without
    /// any capacity concern. Inserting at capacity first sweeps every
    /// expired entry; if the cache is still full, the least recently used
    /// entry is evicted. Fails only with allocation failure, in which case
    /// the cache is unchanged.
    pub fn put_with_ttl(&mut self, key: Key, value: Value, ttl: f64) -> Result<bool> {
        let expires_at = self.now() + ttl;

        if let Some(h) = self.find(key) {
            let entry = self.entries.get_mut(h);
            entry.value = value;
            entry.expires_at = expires_at;
            self.touch(h);
            return Ok(false);
        }

        // Allocate before evicting or linking anything.
        let new = self.entries.try_alloc(CacheEntry {
            key,
            value,
            expires_at,
            prev: self.head,
            next: self.tail,
            hash_next: None,
        })?;

        if self.len >= self.capacity {
            self.cleanup();
            while self.len >= self.capacity {
                self.evict_lru();
            }
        }

        self.hash_link(new);
        self.attach_mru(new);
        self.len += 1;
        Ok(true)
    }

    /// Removes `key` from both the hash chain and the recency list,
    /// returning its value.
    pub fn remove(&mut self, key: Key) -> Option<Value> {
        let h = self.find(key)?;
        Some(self.remove_entry(h).value)
    }

    /// Returns true if `key` is present and live. Expired entries are
    /// removed as a side effect; recency is not touched.
    pub fn contains(&mut self, key: Key) -> bool {
        match self.find(key) {
            Some(h) if self.is_expired(h) => {
                self.remove_entry(h);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Sweeps the whole recency list, removing every expired entry.
    /// Returns how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.now();
        let mut removed = 0;
        let mut cursor = self.entries.get(self.head).next;
        while cursor != self.tail {
            let entry = self.entries.get(cursor);
            let next = entry.next;
            if now > entry.expires_at {
                self.remove_entry(cursor);
                removed += 1;
            }
            cursor = next;
        }
        removed
    }

    /// Seconds until `key` expires, if it is present and live.
    pub fn remaining_ttl(&mut self, key: Key) -> Option<f64> {
        let h = self.find(key)?;
        let now = self.now();
        let expires_at = self.entries.get(h).expires_at;
        if now > expires_at {
            self.remove_entry(h);
            return None;
        }
        Some(expires_at - now)
    }

    /// Resets the expiration of a live entry to now + default TTL and marks
    /// it most recently used, without changing the value. Returns false if
    /// the key is absent or already expired.
    pub fn refresh(&mut self, key: Key) -> bool {
        let Some(h) = self.find(key) else {
            return false;
        };
        if self.is_expired(h) {
            self.remove_entry(h);
            return false;
        }
        let expires_at = self.now() + self.default_ttl;
        self.entries.get_mut(h).expires_at = expires_at;
        self.touch(h);
        true
    }

    /// Number of live entries. Runs a cleanup sweep first so the count
    /// matches observable contents.
    pub fn len(&mut self) -> usize {
        self.cleanup();
        self.len
    }

    /// Number of entries without sweeping; may count expired ones.
    #[must_use]
    pub fn len_dirty(&self) -> usize {
        self.len
    }

    /// Maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true when no entries are stored (expired or not).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true when the entry count has reached capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        let (head, tail) = Self::alloc_sentinels(&mut self.entries);
        self.head = head;
        self.tail = tail;
        self.buckets.fill(None);
        self.len = 0;
    }

    /// Checks the cache invariants: the recency list and the hash chains
    /// hold exactly the same `len` entries, every entry sits in the bucket
    /// its key hashes to, neighbour links are mutually consistent, and the
    /// size never exceeds capacity.
    #[must_use]
    pub fn validate(&self) -> bool {
        if self.len > self.capacity {
            return false;
        }

        // Walk the recency list; each entry must be findable via its bucket.
        let mut list_count = 0;
        let mut cursor = self.entries.get(self.head).next;
        let mut prev = self.head;
        while cursor != self.tail {
            let entry = self.entries.get(cursor);
            if entry.prev != prev {
                return false;
            }
            let mut chain = self.buckets[self.bucket_of(entry.key)];
            let mut found = false;
            while let Some(link) = chain {
                if link == cursor {
                    found = true;
                    break;
                }
                chain = self.entries.get(link).hash_next;
            }
            if !found {
                return false;
            }
            list_count += 1;
            prev = cursor;
            cursor = entry.next;
        }
        if self.entries.get(self.tail).prev != prev {
            return false;
        }
        if list_count != self.len {
            return false;
        }

        // Chains must not hold anything the list does not.
        let mut chain_count = 0;
        for &bucket in &self.buckets {
            let mut chain = bucket;
            while let Some(link) = chain {
                chain_count += 1;
                chain = self.entries.get(link).hash_next;
            }
        }
        chain_count == self.len
    }

    // ─── Internal helpers ────────────────────────────────────────────────

    fn alloc_sentinels(entries: &mut Arena<CacheEntry>) -> (Handle, Handle) {
        let placeholder = Handle::from_index(0);
        let head = entries.alloc(CacheEntry {
            key: 0,
            value: 0,
            expires_at: 0.0,
            prev: placeholder,
            next: placeholder,
            hash_next: None,
        });
        let tail = entries.alloc(CacheEntry {
            key: 0,
            value: 0,
            expires_at: 0.0,
            prev: head,
            next: head,
            hash_next: None,
        });
        let head_entry = entries.get_mut(head);
        head_entry.prev = head;
        head_entry.next = tail;
        entries.get_mut(tail).next = tail;
        (head, tail)
    }

    #[inline]
    fn now(&self) -> f64 {
        (self.clock)()
    }

    #[inline]
    fn bucket_of(&self, key: Key) -> usize {
        #[allow(clippy::cast_sign_loss)]
        let mixed = mix32(key as u32);
        mixed as usize % self.buckets.len()
    }

    fn find(&self, key: Key) -> Option<Handle> {
        let mut cursor = self.buckets[self.bucket_of(key)];
        while let Some(h) = cursor {
            let entry = self.entries.get(h);
            if entry.key == key {
                return Some(h);
            }
            cursor = entry.hash_next;
        }
        None
    }

    fn is_expired(&self, h: Handle) -> bool {
        self.now() > self.entries.get(h).expires_at
    }

    /// Unlinks `h` from the recency list only.
    fn detach(&mut self, h: Handle) {
        let entry = self.entries.get(h);
        let (prev, next) = (entry.prev, entry.next);
        self.entries.get_mut(prev).next = next;
        self.entries.get_mut(next).prev = prev;
    }

    /// Links `h` adjacent to the tail sentinel (most recently used).
    fn attach_mru(&mut self, h: Handle) {
        let last = self.entries.get(self.tail).prev;
        self.entries.get_mut(last).next = h;
        let entry = self.entries.get_mut(h);
        entry.prev = last;
        entry.next = self.tail;
        self.entries.get_mut(self.tail).prev = h;
    }

    fn touch(&mut self, h: Handle) {
        self.detach(h);
        self.attach_mru(h);
    }

    /// Pushes `h` at the front of its hash chain.
    fn hash_link(&mut self, h: Handle) {
        let bucket = self.bucket_of(self.entries.get(h).key);
        let old_head = self.buckets[bucket];
        self.entries.get_mut(h).hash_next = old_head;
        self.buckets[bucket] = Some(h);
    }

    /// Unlinks `h` from its hash chain.
    fn hash_unlink(&mut self, h: Handle) {
        let bucket = self.bucket_of(self.entries.get(h).key);
        let mut cursor = self.buckets[bucket];
        let mut prev: Option<Handle> = None;
        while let Some(link) = cursor {
            if link == h {
                let next = self.entries.get(link).hash_next;
                match prev {
                    None => self.buckets[bucket] = next,
                    Some(p) => self.entries.get_mut(p).hash_next = next,
                }
                return;
            }
            prev = Some(link);
            cursor = self.entries.get(link).hash_next;
        }
    }

    /// Removes `h` from both views and releases its slot.
    fn remove_entry(&mut self, h: Handle) -> CacheEntry {
        self.detach(h);
        self.hash_unlink(h);
        self.len -= 1;
        self.entries.take(h)
    }

    /// Evicts the entry adjacent to the head sentinel.
    fn evict_lru(&mut self) {
        let oldest = self.entries.get(self.head).next;
        if oldest != self.tail {
            self.remove_entry(oldest);
        }
    }
}
