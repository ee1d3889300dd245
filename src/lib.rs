//! Ordered-key indexing and range queries for Rust.
//!
//! This crate provides three interchangeable ordered-map backends and a
//! time-expiring cache, all storing `i32` keys and `i32` values:
//!
//! - [`RbTreeMap`] - red-black tree, deterministic O(log n) with colored-node
//!   rebalancing
//! - [`BTreeMap`] - B-tree with configurable minimum degree, shallow fan-out
//! - [`SkipListMap`] - skip list, probabilistic O(log n) expected with
//!   per-instance seedable randomness
//! - [`TtlCache`] - bounded map combining time-based expiry with LRU
//!   eviction, driven by an injectable clock
//!
//! The three map backends implement the common [`OrderedMap`] trait: lookup,
//! insertion, deletion, min/max, floor/ceiling, and ascending range
//! enumeration into a caller-supplied buffer. For any operation sequence the
//! observable results are identical across backends; only the internal
//! structure (and therefore `height()`) differs.
//!
//! # Example
//!
//! ```
//! use keyspan::{OrderedMap, RbTreeMap};
//!
//! let mut map = RbTreeMap::new();
//! for key in [50, 30, 70, 20, 40] {
//!     map.insert(key, key * 10).unwrap();
//! }
//!
//! assert_eq!(map.get(30), Some(300));
//! assert_eq!(map.floor(45), Some(40));
//! assert_eq!(map.ceiling(45), Some(50));
//!
//! let mut keys = [0; 8];
//! let n = map.range(25, 65, &mut keys);
//! assert_eq!(&keys[..n], &[30, 40, 50]);
//! ```
//!
//! # Allocation behavior
//!
//! Every backend owns its nodes in a slot arena and allocates only inside
//! `insert` (or `put` for the cache). Allocation happens before any link is
//! touched, so a failed insert reports [`Error::AllocationFailure`] and
//! leaves the structure exactly as it was.
//!
//! Alongside the map core, the crate carries the classical one-shot
//! algorithm collaborators ([`alg`], [`graph`], [`heap`], [`trie`],
//! [`fenwick`], [`bloom`]): pure functions and small containers operating on
//! caller-owned buffers, none of which interact with the ordered-map core.

// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]

mod error;
mod map;
mod raw;
mod util;

pub mod alg;
pub mod b_tree;
pub mod bloom;
pub mod fenwick;
pub mod graph;
pub mod heap;
pub mod rb_tree;
pub mod skip_list;
pub mod trie;
pub mod ttl_cache;

pub use b_tree::BTreeMap;
pub use bloom::BloomFilter;
pub use error::{Error, Result};
pub use fenwick::FenwickTree;
pub use map::{Key, OrderedMap, Value};
pub use rb_tree::RbTreeMap;
pub use skip_list::SkipListMap;
pub use trie::Trie;
pub use ttl_cache::TtlCache;
