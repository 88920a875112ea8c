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

/// Increment of the SplitMix64 generator (the 64-bit golden ratio).
const GOLDEN_GAMMA: u64 = 0x9e3779b97f4a7c15;

/// Expands a single element hash into the bit positions probed for that element.
///
/// The sequence is a SplitMix64 generator seeded with the element hash, each draw reduced
/// modulo the filter's bit count. Identical seeds always yield identical positions in the
/// same order, which is what lets insert and lookup agree without `k` separate hash
/// functions.
#[derive(Debug, Clone)]
pub(crate) struct ProbeSequence {
    state: u64,
    bit_count: u64,
    remaining: u64,
}

impl ProbeSequence {
    /// `bit_count` must be non-zero.
    pub(crate) fn new(seed: u64, bit_count: u64, hash_count: u64) -> Self {
        debug_assert!(bit_count > 0);
        ProbeSequence {
            state: seed,
            bit_count,
            remaining: hash_count,
        }
    }
}

impl Iterator for ProbeSequence {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        Some(splitmix64_mix(self.state) % self.bit_count)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

#[inline]
fn splitmix64_mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}
