// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use super::BloomFilterBuilder;
use super::HashCountFormula;
use crate::error::Error;
use crate::hash::ProbeSequence;
use crate::hash::hash_item;

/// A fixed-size Bloom filter over elements of type `T`.
///
/// Provides membership queries with:
/// - No false negatives (inserted items always return `true`)
/// - A false positive rate governed by the bit count and expected set size
/// - Constant space usage; bits are only ever set, never cleared
///
/// Each element is hashed once; the hash seeds a SplitMix64 sequence that yields the
/// `hash_count` bit positions shared by [`insert()`](Self::insert) and
/// [`contains()`](Self::contains).
///
/// Use [`BloomFilter::new`] for the default configuration or [`BloomFilterBuilder`] to
/// choose the seed and [`HashCountFormula`].
pub struct BloomFilter<T: ?Sized> {
    /// Hash seed for the element hash
    pub(super) seed: u64,
    /// Formula the hash count was derived with
    pub(super) formula: HashCountFormula,
    /// Total number of bits in the filter (m)
    pub(super) bit_count: u64,
    /// Number of distinct elements the filter is sized for (n)
    pub(super) expected_set_size: u64,
    /// Number of positions probed per element (k)
    pub(super) hash_count: u64,
    /// Count of bits set to 1
    pub(super) num_bits_set: u64,
    /// Bit array packed into u64 words
    /// Length = ceil(bit_count / 64)
    pub(super) bit_array: Box<[u64]>,
    pub(super) _marker: PhantomData<fn(&T)>,
}

impl<T: Hash + ?Sized> BloomFilter<T> {
    /// Creates an empty filter of `bit_count` bits sized for `expected_set_size` elements,
    /// using the default seed and [`HashCountFormula::IntegerDivision`].
    ///
    /// # Errors
    ///
    /// Returns an error if either size is 0 or the configuration is out of range; see
    /// [`BloomFilterBuilder::build`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilter;
    /// let filter = BloomFilter::<str>::new(100, 10)?;
    /// assert_eq!(filter.hash_count(), 7);
    /// assert!(BloomFilter::<str>::new(100, 0).is_err());
    /// # Ok::<(), bloomset::error::Error>(())
    /// ```
    pub fn new(bit_count: u64, expected_set_size: u64) -> Result<Self, Error> {
        BloomFilterBuilder::new(bit_count, expected_set_size).build()
    }

    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** inserted (or false positive)
    /// - `false`: Item was **definitely not** inserted
    ///
    /// A filter whose hash count is 0 probes nothing and always returns `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilter;
    /// let mut filter = BloomFilter::<str>::new(20, 10)?;
    /// filter.insert("Test String");
    ///
    /// assert!(filter.contains("Test String"));
    /// assert!(!filter.contains("Test"));
    /// # Ok::<(), bloomset::error::Error>(())
    /// ```
    pub fn contains(&self, item: &T) -> bool {
        self.probes(item).all(|bit_index| self.get_bit(bit_index))
    }

    /// Inserts an item into the filter.
    ///
    /// After insertion, `contains(item)` will always return `true`.
    pub fn insert(&mut self, item: &T) {
        for bit_index in self.probes(item) {
            self.set_bit(bit_index);
        }
    }

    /// Tests and inserts an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilter;
    /// let mut filter = BloomFilter::<u64>::new(1000, 100)?;
    ///
    /// assert!(!filter.contains_and_insert(&42));
    /// assert!(filter.contains_and_insert(&42));
    /// # Ok::<(), bloomset::error::Error>(())
    /// ```
    pub fn contains_and_insert(&mut self, item: &T) -> bool {
        let mut was_present = true;
        for bit_index in self.probes(item) {
            was_present &= self.set_bit(bit_index);
        }
        was_present
    }

    fn probes(&self, item: &T) -> ProbeSequence {
        let seed = hash_item(item, self.seed);
        ProbeSequence::new(seed, self.bit_count, self.hash_count)
    }
}

impl<T: ?Sized> BloomFilter<T> {
    /// Returns whether no bit has been set yet.
    pub fn is_empty(&self) -> bool {
        self.num_bits_set == 0
    }

    /// Returns the number of bits set to 1.
    pub fn bits_used(&self) -> u64 {
        self.num_bits_set
    }

    /// Returns the total number of bits in the filter (m).
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    /// Returns the number of distinct elements the filter was sized for (n).
    pub fn expected_set_size(&self) -> u64 {
        self.expected_set_size
    }

    /// Returns the number of bit positions probed per element (k).
    pub fn hash_count(&self) -> u64 {
        self.hash_count
    }

    /// Returns the formula the hash count was derived with.
    pub fn hash_count_formula(&self) -> HashCountFormula {
        self.formula
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the bit array packed into `u64` words, least significant bit first.
    ///
    /// Bits at or beyond [`bit_count()`](Self::bit_count) in the last word are always 0.
    pub fn bit_words(&self) -> &[u64] {
        &self.bit_array
    }

    /// Returns the current load factor (fraction of bits set).
    ///
    /// Values near 0.5 indicate the filter is approaching its designed capacity.
    pub fn load_factor(&self) -> f64 {
        self.num_bits_set as f64 / self.bit_count as f64
    }

    /// Estimates the current false positive probability as `load_factor^k`.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powf(self.hash_count as f64)
    }

    fn get_bit(&self, bit_index: u64) -> bool {
        let word_index = (bit_index >> 6) as usize;
        let mask = 1u64 << (bit_index & 63);
        (self.bit_array[word_index] & mask) != 0
    }

    /// Sets a single bit, returning whether it was already set.
    fn set_bit(&mut self, bit_index: u64) -> bool {
        let word_index = (bit_index >> 6) as usize;
        let mask = 1u64 << (bit_index & 63);

        let word = &mut self.bit_array[word_index];
        let was_set = (*word & mask) != 0;
        if !was_set {
            *word |= mask;
            self.num_bits_set += 1;
        }
        was_set
    }
}

impl<T: ?Sized> Clone for BloomFilter<T> {
    fn clone(&self) -> Self {
        BloomFilter {
            seed: self.seed,
            formula: self.formula,
            bit_count: self.bit_count,
            expected_set_size: self.expected_set_size,
            hash_count: self.hash_count,
            num_bits_set: self.num_bits_set,
            bit_array: self.bit_array.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> PartialEq for BloomFilter<T> {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed
            && self.formula == other.formula
            && self.bit_count == other.bit_count
            && self.expected_set_size == other.expected_set_size
            && self.hash_count == other.hash_count
            && self.bit_array == other.bit_array
    }
}

impl<T: ?Sized> Eq for BloomFilter<T> {}

impl<T: ?Sized> fmt::Debug for BloomFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("seed", &self.seed)
            .field("formula", &self.formula)
            .field("bit_count", &self.bit_count)
            .field("expected_set_size", &self.expected_set_size)
            .field("hash_count", &self.hash_count)
            .field("num_bits_set", &self.num_bits_set)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sets_exactly_the_probed_bits() {
        let mut filter = BloomFilter::<str>::new(20, 10).unwrap();
        filter.insert("Test String");

        // Probe positions of "Test String" under seed 9001 are 5 and 10.
        assert_eq!(filter.bit_words(), &[(1 << 5) | (1 << 10)]);
        assert_eq!(filter.bits_used(), 2);
        assert!(filter.get_bit(5));
        assert!(filter.get_bit(10));
        assert!(!filter.get_bit(8));
    }

    #[test]
    fn test_lookup_requires_every_probed_bit() {
        let mut filter = BloomFilter::<str>::new(20, 10).unwrap();
        filter.insert("Test String");
        // "Test" probes 8 then 1, both clear.
        assert!(!filter.contains("Test"));

        filter.set_bit(8);
        assert!(!filter.contains("Test"));
        filter.set_bit(1);
        assert!(filter.contains("Test"));
    }

    #[test]
    fn test_set_bit_reports_previous_state() {
        let mut filter = BloomFilter::<u64>::new(128, 16).unwrap();
        assert!(!filter.set_bit(70));
        assert!(filter.set_bit(70));
        assert_eq!(filter.bits_used(), 1);
        assert_eq!(filter.bit_words(), &[0, 1 << 6]);
    }

    #[test]
    fn test_statistics() {
        let mut filter = BloomFilter::<str>::new(1000, 100).unwrap();
        assert!(filter.is_empty());
        assert_eq!(filter.load_factor(), 0.0);
        assert_eq!(filter.estimated_fpp(), 0.0);

        filter.insert("test");
        assert!(!filter.is_empty());
        assert!(filter.bits_used() > 0);
        assert!(filter.bits_used() <= filter.hash_count());
        assert!(filter.load_factor() > 0.0);
        assert!(filter.estimated_fpp() > 0.0);
    }

    #[test]
    fn test_clone_and_eq() {
        let mut filter = BloomFilter::<str>::new(64, 8).unwrap();
        filter.insert("a");
        let copy = filter.clone();
        assert_eq!(filter, copy);

        filter.insert("b");
        assert_ne!(filter, copy);
    }

    #[test]
    fn test_debug_omits_bits() {
        let filter = BloomFilter::<str>::new(20, 10).unwrap();
        assert_eq!(
            format!("{filter:?}"),
            "BloomFilter { seed: 9001, formula: IntegerDivision, bit_count: 20, \
             expected_set_size: 10, hash_count: 2, num_bits_set: 0, .. }"
        );
    }
}
