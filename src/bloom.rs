//! Bloom filter over byte slices with FNV-1a double hashing.

use crate::util::{FNV_OFFSET_BASIS, fnv1a64};

/// A fixed-size Bloom filter: no false negatives, tunable false-positive
/// rate, no removal.
///
/// The `k` probe positions are derived from two FNV-1a passes combined as
/// `h1 + i * h2` (double hashing), so adding an element costs two hashes
/// regardless of `k`.
///
/// # Example
///
/// ```
/// use keyspan::BloomFilter;
///
/// let mut filter = BloomFilter::optimal(1000, 0.01);
/// filter.add(b"alpha");
/// assert!(filter.contains(b"alpha"));
/// assert!(!filter.contains(b"beta") || filter.estimated_fpr() > 0.0);
/// ```
#[derive(Clone)]
pub struct BloomFilter {
    bits: Vec<u64>,
    num_bits: usize,
    num_hashes: usize,
    inserted: usize,
}

impl BloomFilter {
    /// Creates a filter with an explicit geometry.
    ///
    /// # Panics
    ///
    /// Panics when `num_bits` or `num_hashes` is 0.
    #[must_use]
    pub fn new(num_bits: usize, num_hashes: usize) -> Self {
        assert!(num_bits > 0, "`BloomFilter::new()` - num_bits must be positive");
        assert!(num_hashes > 0, "`BloomFilter::new()` - num_hashes must be positive");
        Self {
            bits: vec![0; num_bits.div_ceil(64)],
            num_bits,
            num_hashes,
            inserted: 0,
        }
    }

    /// Creates a filter sized for `expected_elements` at the target
    /// false-positive rate: `m = -n ln p / (ln 2)^2`, `k = (m / n) ln 2`.
    ///
    /// # Panics
    ///
    /// Panics when `expected_elements` is 0 or the rate is outside (0, 1).
    #[must_use]
    pub fn optimal(expected_elements: usize, false_positive_rate: f64) -> Self {
        assert!(expected_elements > 0, "`BloomFilter::optimal()` - expected_elements must be positive");
        assert!(
            false_positive_rate > 0.0 && false_positive_rate < 1.0,
            "`BloomFilter::optimal()` - rate must lie in (0, 1)"
        );
        let n = expected_elements as f64;
        let ln2 = std::f64::consts::LN_2;
        let m = (-n * false_positive_rate.ln() / (ln2 * ln2)).ceil();
        let k = ((m / n) * ln2).round().max(1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self::new(m as usize, k as usize)
    }

    /// Sets the `k` bits for `data`.
    pub fn add(&mut self, data: &[u8]) {
        let (h1, h2) = self.hash_pair(data);
        for i in 0..self.num_hashes {
            let bit = self.probe(h1, h2, i);
            self.bits[bit / 64] |= 1 << (bit % 64);
        }
        self.inserted += 1;
    }

    /// Returns false when `data` was definitely never added; true means
    /// "probably added".
    #[must_use]
    pub fn contains(&self, data: &[u8]) -> bool {
        let (h1, h2) = self.hash_pair(data);
        (0..self.num_hashes).all(|i| {
            let bit = self.probe(h1, h2, i);
            self.bits[bit / 64] & (1 << (bit % 64)) != 0
        })
    }

    /// Number of set bits.
    #[must_use]
    pub fn bits_set(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Number of `add` calls (duplicates counted).
    #[must_use]
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// Total bit capacity.
    #[must_use]
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Probes per element.
    #[must_use]
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Estimated false-positive rate at the current fill: `(set / m)^k`.
    #[must_use]
    pub fn estimated_fpr(&self) -> f64 {
        let fill = self.bits_set() as f64 / self.num_bits as f64;
        fill.powi(i32::try_from(self.num_hashes).unwrap_or(i32::MAX))
    }

    /// Unions `other` into `self`. Returns false (and changes nothing) when
    /// the geometries differ.
    pub fn merge(&mut self, other: &BloomFilter) -> bool {
        if self.num_bits != other.num_bits || self.num_hashes != other.num_hashes {
            return false;
        }
        for (word, &other_word) in self.bits.iter_mut().zip(&other.bits) {
            *word |= other_word;
        }
        self.inserted += other.inserted;
        true
    }

    /// Clears every bit.
    pub fn clear(&mut self) {
        self.bits.fill(0);
        self.inserted = 0;
    }

    fn hash_pair(&self, data: &[u8]) -> (u64, u64) {
        let h1 = fnv1a64(data, FNV_OFFSET_BASIS);
        // Second basis: the first hash, so the pair is decorrelated.
        let h2 = fnv1a64(data, h1) | 1; // odd, to cover all positions
        (h1, h2)
    }

    #[inline]
    fn probe(&self, h1: u64, h2: u64, i: usize) -> usize {
        let combined = h1.wrapping_add(h2.wrapping_mul(i as u64));
        (combined % self.num_bits as u64) as usize
    }
}
