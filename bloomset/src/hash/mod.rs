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

//! Element hashing and probe-position fan-out.

mod murmurhash;
mod probe;

use std::hash::Hash;
use std::hash::Hasher;

use self::murmurhash::MurmurHash3X64128;
pub(crate) use self::probe::ProbeSequence;

/// The seed 9001 used to hash elements is a prime number that was chosen very early on in
/// experimental testing of MurmurHash-based sketches.
///
/// Two filters only probe the same positions for an element when they share a seed.
pub const DEFAULT_UPDATE_SEED: u64 = 9001;

/// Reduces an element to the single 64-bit integer that seeds its probe sequence.
///
/// Uses the element's [`Hash`] impl, fed into a seeded MurmurHash3, so equal elements map
/// to equal seeds across calls and filter instances. The digest is fixed for a given byte
/// stream, but the bytes come from the `Hash` impl: `std` writes integers in native byte
/// order and length prefixes as `usize`, so seeds agree only for the same `Hash` byte
/// stream on the same platform.
pub(crate) fn hash_item<T: Hash + ?Sized>(item: &T, seed: u64) -> u64 {
    let mut hasher = MurmurHash3X64128::with_seed(seed);
    item.hash(&mut hasher);
    hasher.finish()
}
