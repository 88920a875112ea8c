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

use std::f64::consts::LN_2;
use std::hash::Hash;
use std::marker::PhantomData;

use super::BloomFilter;
use crate::error::Error;
use crate::hash::DEFAULT_UPDATE_SEED;

/// Smallest accepted bit count.
pub const MIN_BIT_COUNT: u64 = 1;
/// Largest accepted bit count.
pub const MAX_BIT_COUNT: u64 = i32::MAX as u64 * 64;
/// Smallest accepted expected set size.
pub const MIN_EXPECTED_SET_SIZE: u64 = 1;

/// How the number of probes per element (k) is derived from the bit count (m) and the
/// expected set size (n).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashCountFormula {
    /// `k = ceil(floor(m / n) * ln 2)`.
    ///
    /// The ratio is truncated before scaling, so `m = 15, n = 10` gives `k = 1`. When
    /// `m < n` the ratio truncates to zero and so does `k`: such a filter probes nothing,
    /// inserts leave it untouched and every lookup reports a hit.
    #[default]
    IntegerDivision,
    /// `k = ceil((m / n) * ln 2)` with real-valued division.
    ///
    /// `m = 15, n = 10` gives `k = 2`. Never yields zero for valid sizing.
    RealDivision,
}

/// Builder for creating [`BloomFilter`] instances.
///
/// The bit count and expected set size are fixed up front; the hash seed and the
/// [`HashCountFormula`] can be adjusted before calling [`build()`](Self::build), which
/// validates the whole configuration.
///
/// # Examples
///
/// ```
/// # use bloomset::bloom::BloomFilter;
/// # use bloomset::bloom::BloomFilterBuilder;
/// # use bloomset::bloom::HashCountFormula;
/// let filter: BloomFilter<str> = BloomFilterBuilder::new(15, 10)
///     .hash_count_formula(HashCountFormula::RealDivision)
///     .seed(42)
///     .build()?;
/// assert_eq!(filter.hash_count(), 2);
/// # Ok::<(), bloomset::error::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder {
    bit_count: u64,
    expected_set_size: u64,
    seed: u64,
    formula: HashCountFormula,
}

impl BloomFilterBuilder {
    /// Creates a builder for a filter of `bit_count` bits sized for `expected_set_size`
    /// distinct elements.
    pub fn new(bit_count: u64, expected_set_size: u64) -> Self {
        BloomFilterBuilder {
            bit_count,
            expected_set_size,
            seed: DEFAULT_UPDATE_SEED,
            formula: HashCountFormula::default(),
        }
    }

    /// Sets a custom hash seed (default: 9001).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Selects how the number of probes is derived (default:
    /// [`HashCountFormula::IntegerDivision`]).
    pub fn hash_count_formula(mut self, formula: HashCountFormula) -> Self {
        self.formula = formula;
        self
    }

    /// Builds the Bloom filter with every bit cleared.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if:
    /// - `bit_count` is outside `[MIN_BIT_COUNT, MAX_BIT_COUNT]`
    /// - `expected_set_size` is 0
    pub fn build<T: Hash + ?Sized>(self) -> Result<BloomFilter<T>, Error> {
        if !(MIN_BIT_COUNT..=MAX_BIT_COUNT).contains(&self.bit_count) {
            return Err(Error::out_of_range(
                "bit_count",
                self.bit_count,
                MIN_BIT_COUNT,
                MAX_BIT_COUNT,
            ));
        }
        if self.expected_set_size < MIN_EXPECTED_SET_SIZE {
            return Err(Error::invalid_argument(format!(
                "expected_set_size must be at least {MIN_EXPECTED_SET_SIZE}"
            ))
            .with_context("expected_set_size", self.expected_set_size));
        }

        let hash_count =
            Self::hash_count_for(self.bit_count, self.expected_set_size, self.formula);

        let num_words = usize::try_from(self.bit_count.div_ceil(64)).map_err(|_| {
            Error::invalid_argument("bit_count exceeds the addressable size")
                .with_context("bit_count", self.bit_count)
        })?;

        Ok(BloomFilter {
            seed: self.seed,
            formula: self.formula,
            bit_count: self.bit_count,
            expected_set_size: self.expected_set_size,
            hash_count,
            num_bits_set: 0,
            bit_array: vec![0u64; num_words].into_boxed_slice(),
            _marker: PhantomData,
        })
    }

    /// Derives the number of probes per element from the sizing parameters.
    ///
    /// # Panics
    ///
    /// Panics if `expected_set_size` is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilterBuilder;
    /// # use bloomset::bloom::HashCountFormula;
    /// use HashCountFormula::*;
    /// assert_eq!(BloomFilterBuilder::hash_count_for(100, 10, IntegerDivision), 7);
    /// assert_eq!(BloomFilterBuilder::hash_count_for(15, 10, IntegerDivision), 1);
    /// assert_eq!(BloomFilterBuilder::hash_count_for(15, 10, RealDivision), 2);
    /// ```
    pub fn hash_count_for(
        bit_count: u64,
        expected_set_size: u64,
        formula: HashCountFormula,
    ) -> u64 {
        assert!(expected_set_size > 0, "expected_set_size must be at least 1");

        let ratio = match formula {
            HashCountFormula::IntegerDivision => (bit_count / expected_set_size) as f64,
            HashCountFormula::RealDivision => bit_count as f64 / expected_set_size as f64,
        };
        // Ceil to avoid selecting too few hashes.
        (ratio * LN_2).ceil() as u64
    }

    /// Suggests the number of bits that holds `expected_set_size` elements at a target
    /// false positive probability.
    ///
    /// Formula: `m = -n * ln(p) / (ln(2)^2)`
    ///
    /// # Panics
    ///
    /// Panics if `expected_set_size` is 0 or `fpp` is not in (0.0, 1.0).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilterBuilder;
    /// let bits = BloomFilterBuilder::suggest_bit_count(1000, 0.01);
    /// assert!(bits > 9000 && bits < 10000); // ~9586 bits
    /// ```
    pub fn suggest_bit_count(expected_set_size: u64, fpp: f64) -> u64 {
        assert!(expected_set_size > 0, "expected_set_size must be at least 1");
        assert!(
            fpp > 0.0 && fpp < 1.0,
            "fpp must be between 0.0 and 1.0 (exclusive)"
        );

        let n = expected_set_size as f64;
        let bits = (-n * fpp.ln() / (LN_2 * LN_2)).ceil() as u64;
        bits.clamp(MIN_BIT_COUNT, MAX_BIT_COUNT)
    }

    /// Theoretical false positive probability once `expected_set_size` distinct elements
    /// have been inserted.
    ///
    /// Formula: `(1 - e^(-k * n / m))^k`
    pub fn theoretical_fpp(bit_count: u64, expected_set_size: u64, hash_count: u64) -> f64 {
        let m = bit_count as f64;
        let n = expected_set_size as f64;
        let k = hash_count as f64;
        (1.0 - (-k * n / m).exp()).powf(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_hash_count_integer_division() {
        use HashCountFormula::IntegerDivision;

        assert_eq!(BloomFilterBuilder::hash_count_for(20, 10, IntegerDivision), 2);
        assert_eq!(BloomFilterBuilder::hash_count_for(100, 10, IntegerDivision), 7);
        assert_eq!(BloomFilterBuilder::hash_count_for(15, 10, IntegerDivision), 1);
        assert_eq!(BloomFilterBuilder::hash_count_for(10, 10, IntegerDivision), 1);
        assert_eq!(BloomFilterBuilder::hash_count_for(9, 10, IntegerDivision), 0);
    }

    #[test]
    fn test_hash_count_real_division() {
        use HashCountFormula::RealDivision;

        assert_eq!(BloomFilterBuilder::hash_count_for(20, 10, RealDivision), 2);
        assert_eq!(BloomFilterBuilder::hash_count_for(100, 10, RealDivision), 7);
        assert_eq!(BloomFilterBuilder::hash_count_for(15, 10, RealDivision), 2);
        assert_eq!(BloomFilterBuilder::hash_count_for(9, 10, RealDivision), 1);
    }

    #[test]
    #[should_panic(expected = "expected_set_size must be at least 1")]
    fn test_hash_count_zero_set_size() {
        BloomFilterBuilder::hash_count_for(20, 0, HashCountFormula::IntegerDivision);
    }

    #[test]
    fn test_build_defaults() {
        let filter: BloomFilter<str> = BloomFilterBuilder::new(20, 10).build().unwrap();
        assert_eq!(filter.bit_count(), 20);
        assert_eq!(filter.expected_set_size(), 10);
        assert_eq!(filter.hash_count(), 2);
        assert_eq!(filter.seed(), DEFAULT_UPDATE_SEED);
        assert_eq!(filter.hash_count_formula(), HashCountFormula::IntegerDivision);
        assert_eq!(filter.bit_words().len(), 1);
    }

    #[test]
    fn test_build_rejects_zero_sizes() {
        let err = BloomFilterBuilder::new(0, 10).build::<str>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.context("bit_count"), Some("0"));

        let err = BloomFilterBuilder::new(20, 0).build::<str>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.context("expected_set_size"), Some("0"));
    }

    #[test]
    fn test_build_rejects_oversized_bit_count() {
        let err = BloomFilterBuilder::new(MAX_BIT_COUNT + 1, 10)
            .build::<u64>()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_build_accepts_large_ratio() {
        // ceil(floor(100_000 / 1) * ln 2) probes per element.
        let mut filter: BloomFilter<u64> =
            BloomFilterBuilder::new(100_000, 1).build().unwrap();
        assert_eq!(filter.hash_count(), 69_315);

        filter.insert(&42);
        assert!(filter.contains(&42));
        assert!(filter.bits_used() <= filter.hash_count());
    }

    #[test]
    fn test_hash_count_at_max_bit_count() {
        let k =
            BloomFilterBuilder::hash_count_for(MAX_BIT_COUNT, 1, HashCountFormula::IntegerDivision);
        assert!(k > u64::from(u32::MAX));
    }

    #[test]
    fn test_suggest_bit_count() {
        assert_eq!(BloomFilterBuilder::suggest_bit_count(1000, 0.01), 9586);
        let m = BloomFilterBuilder::suggest_bit_count(1000, 0.01);
        let k = BloomFilterBuilder::hash_count_for(m, 1000, HashCountFormula::RealDivision);
        assert_eq!(k, 7);
    }

    #[test]
    #[should_panic(expected = "fpp must be between")]
    fn test_suggest_bit_count_invalid_fpp() {
        BloomFilterBuilder::suggest_bit_count(100, 1.5);
    }

    #[test]
    fn test_theoretical_fpp() {
        let fpp = BloomFilterBuilder::theoretical_fpp(10_000, 1_000, 7);
        assert!((fpp - 0.008194).abs() < 1e-5, "fpp = {fpp}");
        assert_eq!(BloomFilterBuilder::theoretical_fpp(20, 10, 0), 1.0);
    }
}
