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

use byteorder::ByteOrder;
use byteorder::LE;

use super::DEFAULT_SEED;

const M: u32 = 0x5bd1e995;
const R: u32 = 24;

/// Computes the 32-bit MurmurHash2 of `key` with the given seed.
///
/// Words are always read in little-endian order, so the result does not depend on the host.
///
/// # Examples
///
/// ```
/// use inbloom::hash::murmur2_32;
///
/// assert_eq!(murmur2_32(b"", 0), 0);
/// assert_eq!(murmur2_32(b"abc", 0), murmur2_32(b"abc", 0));
/// assert_ne!(murmur2_32(b"abc", 0), murmur2_32(b"abc", 1));
/// ```
pub fn murmur2_32(key: &[u8], seed: u32) -> u32 {
    let mut h = seed ^ (key.len() as u32);

    let mut chunks = key.chunks_exact(4);
    for chunk in &mut chunks {
        let mut k = LE::read_u32(chunk);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);

        h = h.wrapping_mul(M);
        h ^= k;
    }

    // tail: each case falls through to the shorter ones
    let tail = chunks.remainder();
    if tail.len() >= 3 {
        h ^= u32::from(tail[2]) << 16;
    }
    if tail.len() >= 2 {
        h ^= u32::from(tail[1]) << 8;
    }
    if !tail.is_empty() {
        h ^= u32::from(tail[0]);
        h = h.wrapping_mul(M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^ (h >> 15)
}

/// A resettable MurmurHash2 state for callers that want a hasher object.
///
/// Unlike [`std::hash::Hasher`], every call to [`write`](Self::write) hashes its whole input in
/// one pass and replaces the previous result. Feeding a key in several pieces does not produce
/// the hash of the concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MurmurHash2 {
    seed: u32,
    sum: u32,
}

impl MurmurHash2 {
    /// Creates a hasher that uses `seed` for every write.
    pub fn with_seed(seed: u32) -> Self {
        MurmurHash2 { seed, sum: 0 }
    }

    /// Returns the seed used by this hasher.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Clears the last computed sum.
    pub fn reset(&mut self) {
        self.sum = 0;
    }

    /// Hashes `bytes` and stores the result, returning the number of bytes consumed.
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        self.sum = murmur2_32(bytes, self.seed);
        bytes.len()
    }

    /// Returns the hash of the last write, or 0 after construction or [`reset`](Self::reset).
    pub fn sum32(&self) -> u32 {
        self.sum
    }

    /// Appends the big-endian bytes of [`sum32`](Self::sum32) to `out`.
    pub fn sum(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.sum.to_be_bytes());
    }
}

impl Default for MurmurHash2 {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}
