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

use std::hash::Hasher;

use byteorder::ByteOrder;
use byteorder::LE;

const C1: u64 = 0x87c37b91114253d5;
const C2: u64 = 0x4cf5ad432745937f;
const BLOCK_LEN: usize = 16;

/// Streaming MurmurHash3 (x64, 128-bit variant) exposed as a [`Hasher`].
///
/// Feeding the same bytes yields the same digest regardless of how the input is split
/// across [`Hasher::write`] calls or which process computes it.
#[derive(Debug, Clone)]
pub struct MurmurHash3X64128 {
    h1: u64,
    h2: u64,
    total_len: u64,
    pending: [u8; BLOCK_LEN],
    pending_len: usize,
}

impl MurmurHash3X64128 {
    pub fn with_seed(seed: u64) -> Self {
        MurmurHash3X64128 {
            h1: seed,
            h2: seed,
            total_len: 0,
            pending: [0; BLOCK_LEN],
            pending_len: 0,
        }
    }

    pub fn finish128(&self) -> (u64, u64) {
        let mut h1 = self.h1;
        let mut h2 = self.h2;
        let tail = &self.pending[..self.pending_len];

        if tail.len() > 8 {
            let k2 = LE::read_uint(&tail[8..], tail.len() - 8);
            h2 ^= mix_k2(k2);
        }
        if !tail.is_empty() {
            let n = tail.len().min(8);
            let k1 = LE::read_uint(&tail[..n], n);
            h1 ^= mix_k1(k1);
        }

        h1 ^= self.total_len;
        h2 ^= self.total_len;
        h1 = h1.wrapping_add(h2);
        h2 = h2.wrapping_add(h1);
        h1 = fmix64(h1);
        h2 = fmix64(h2);
        h1 = h1.wrapping_add(h2);
        h2 = h2.wrapping_add(h1);
        (h1, h2)
    }

    fn mix_block(&mut self, block: &[u8]) {
        let k1 = LE::read_u64(&block[..8]);
        let k2 = LE::read_u64(&block[8..]);

        self.h1 ^= mix_k1(k1);
        self.h1 = self
            .h1
            .rotate_left(27)
            .wrapping_add(self.h2)
            .wrapping_mul(5)
            .wrapping_add(0x52dce729);

        self.h2 ^= mix_k2(k2);
        self.h2 = self
            .h2
            .rotate_left(31)
            .wrapping_add(self.h1)
            .wrapping_mul(5)
            .wrapping_add(0x38495ab5);
    }
}

impl Hasher for MurmurHash3X64128 {
    fn finish(&self) -> u64 {
        self.finish128().0
    }

    fn write(&mut self, mut bytes: &[u8]) {
        self.total_len += bytes.len() as u64;

        if self.pending_len > 0 {
            let take = (BLOCK_LEN - self.pending_len).min(bytes.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&bytes[..take]);
            self.pending_len += take;
            bytes = &bytes[take..];
            if self.pending_len < BLOCK_LEN {
                return;
            }
            let block = self.pending;
            self.mix_block(&block);
            self.pending_len = 0;
        }

        let mut blocks = bytes.chunks_exact(BLOCK_LEN);
        for block in &mut blocks {
            self.mix_block(block);
        }

        let rest = blocks.remainder();
        self.pending[..rest.len()].copy_from_slice(rest);
        self.pending_len = rest.len();
    }
}

#[inline]
fn mix_k1(k1: u64) -> u64 {
    k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2)
}

#[inline]
fn mix_k2(k2: u64) -> u64 {
    k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1)
}

/// Finalization mix: force all bits of a hash block to avalanche.
#[inline]
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51afd7ed558ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ceb9fe1a85ec53);
    k ^ (k >> 33)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn murmurhash3_x64_128(key: &[u8], seed: u64) -> (u64, u64) {
        let mut hasher = MurmurHash3X64128::with_seed(seed);
        hasher.write(key);
        hasher.finish128()
    }

    #[test]
    fn test_known_answers() {
        // remainder > 8
        let key = "The quick brown fox jumps over the lazy dog";
        assert_eq!(
            murmurhash3_x64_128(key.as_bytes(), 0),
            (0xe34bbc7bbc071b6c, 0x7a433ca9c49a9347)
        );

        // one flipped bit
        let key = "The quick brown fox jumps over the lazy eog";
        assert_eq!(
            murmurhash3_x64_128(key.as_bytes(), 0),
            (0x362108102c62d1c9, 0x3285cd100292b305)
        );

        // remainder < 8
        let key = "The quick brown fox jumps over the lazy dogdogdog";
        assert_eq!(
            murmurhash3_x64_128(key.as_bytes(), 0),
            (0x9c8205300e612fc4, 0xcbc0af6136aa3df9)
        );

        // remainder = 8
        let key = "The quick brown fox jumps over the lazy1";
        assert_eq!(
            murmurhash3_x64_128(key.as_bytes(), 0),
            (0xe3301a827e5cdfe3, 0xbdbf05f8da0f0392)
        );

        // no remainder
        let key = "The quick brown fox jumps over t";
        assert_eq!(
            murmurhash3_x64_128(key.as_bytes(), 0),
            (0xdf6af91bb29bdacf, 0x91a341c58df1f3a6)
        );
    }

    #[test]
    fn test_split_writes_match_single_write() {
        let key = b"The quick brown fox jumps over the lazy dog";
        let expected = murmurhash3_x64_128(key, 9001);

        for split in [1, 7, 15, 16, 17, 31, 40] {
            let mut hasher = MurmurHash3X64128::with_seed(9001);
            hasher.write(&key[..split]);
            hasher.write(&key[split..]);
            assert_eq!(hasher.finish128(), expected, "split at {split}");
        }

        let mut hasher = MurmurHash3X64128::with_seed(9001);
        for byte in key {
            hasher.write(std::slice::from_ref(byte));
        }
        assert_eq!(hasher.finish128(), expected);
    }

    #[test]
    fn test_empty_input_depends_on_seed() {
        assert_eq!(MurmurHash3X64128::with_seed(0).finish128(), (0, 0));
        assert_eq!(MurmurHash3X64128::with_seed(9001).finish(), 0x1e70a32266491bb9);
    }
}
