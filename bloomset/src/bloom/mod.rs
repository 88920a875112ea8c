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

//! Bloom filter for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If an item was inserted, `contains()` will always return `true`
//! - **Possible false positives**: `contains()` may return `true` for items never inserted
//! - **Fixed size**: the bit count is chosen at construction and never changes
//! - **Monotonic**: bits are only ever set; there is no deletion
//!
//! # Usage
//!
//! ```rust
//! use bloomset::bloom::BloomFilter;
//!
//! // 20 bits sized for 10 elements: k = ceil(floor(20 / 10) * ln 2) = 2
//! let mut filter = BloomFilter::<str>::new(20, 10)?;
//! assert!(!filter.contains("empty"));
//!
//! filter.insert("Test String");
//! assert!(filter.contains("Test String"));
//! assert!(!filter.contains("Test")); // never inserted
//! # Ok::<(), bloomset::error::Error>(())
//! ```
//!
//! # Choosing the number of probes
//!
//! The number of probes `k` is derived from the bit count `m` and the expected set size
//! `n`. By default the ratio `m / n` is truncated to an integer before it is scaled by
//! `ln 2`, so a filter with fewer bits than expected elements gets `k = 0` and reports
//! every element as present. [`HashCountFormula::RealDivision`] uses the real-valued ratio
//! instead:
//!
//! ```rust
//! # use bloomset::bloom::BloomFilter;
//! # use bloomset::bloom::BloomFilterBuilder;
//! # use bloomset::bloom::HashCountFormula;
//! let legacy = BloomFilter::<str>::new(9, 10)?;
//! assert_eq!(legacy.hash_count(), 0);
//! assert!(legacy.contains("anything"));
//!
//! let real: BloomFilter<str> = BloomFilterBuilder::new(9, 10)
//!     .hash_count_formula(HashCountFormula::RealDivision)
//!     .build()?;
//! assert_eq!(real.hash_count(), 1);
//! assert!(!real.contains("anything"));
//! # Ok::<(), bloomset::error::Error>(())
//! ```
//!
//! # Implementation Details
//!
//! - Elements are hashed once with a seeded MurmurHash3 (x64, 128-bit, low half)
//! - The hash seeds a SplitMix64 generator whose draws, reduced modulo `m`, are the probe
//!   positions
//! - Bits packed in `u64` words
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"

mod builder;
mod filter;

pub use self::builder::BloomFilterBuilder;
pub use self::builder::HashCountFormula;
pub use self::builder::MAX_BIT_COUNT;
pub use self::builder::MIN_BIT_COUNT;
pub use self::builder::MIN_EXPECTED_SET_SIZE;
pub use self::filter::BloomFilter;
