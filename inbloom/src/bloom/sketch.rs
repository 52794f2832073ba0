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

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use tracing::debug;

use crate::bloom::BloomFilterBuilder;
use crate::bloom::serialization::HEADER_SIZE;
use crate::bloom::serialization::compute_checksum;
use crate::bloom::serialization::decode_error_rate;
use crate::bloom::serialization::encode_error_rate;
use crate::codec::FilterBytes;
use crate::codec::FilterSlice;
use crate::error::Error;
use crate::hash::DEFAULT_SEED;
use crate::hash::murmur2_32;

/// A Bloom filter whose bit layout is shared with the other inbloom implementations.
///
/// Provides membership queries with:
/// - No false negatives (added keys always return `true`)
/// - A false positive rate close to the configured error rate while at most `entries` keys
///   have been added
/// - A fixed size derived from `entries` and the error rate
///
/// Keys are byte strings. Two filters built with the same parameters and fed the same keys
/// hold identical bytes, whatever language produced them.
///
/// The filter has no interior mutability: [`add()`](Self::add) takes `&mut self`, so sharing
/// one between threads requires external locking.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilter {
    /// Expected number of keys, as configured
    pub(super) entries: u32,
    /// Target false positive probability
    pub(super) error_rate: f64,
    pub(super) bits_per_element: f64,
    /// Number of addressable bits (m); bit positions never land past it
    pub(super) num_bits: u32,
    /// Number of bit positions per key (k)
    pub(super) num_hashes: u32,
    /// Bit array, `ceil(num_bits / 8)` bytes, bit `x` is `1 << (x % 8)` of byte `x / 8`
    pub(super) bit_array: Vec<u8>,
}

impl BloomFilter {
    /// Creates an empty filter for about `entries` keys with the given error rate.
    ///
    /// # Errors
    ///
    /// See [`BloomFilterBuilder::build()`].
    ///
    /// # Examples
    ///
    /// ```
    /// use inbloom::bloom::BloomFilter;
    ///
    /// let mut filter = BloomFilter::new(20, 0.01).unwrap();
    /// assert!(!filter.add("foo"));
    /// assert!(filter.contains("foo"));
    /// ```
    pub fn new(entries: u32, error_rate: f64) -> Result<Self, Error> {
        BloomFilterBuilder::with_accuracy(entries, error_rate).build()
    }

    /// Creates a filter over an existing bit array, such as the raw bytes of a filter produced
    /// by another inbloom implementation.
    ///
    /// The buffer is taken over without copying.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::SizeMismatch`](crate::error::ErrorKind::SizeMismatch) if `data`
    /// does not have the byte length derived from `entries` and `error_rate`, and
    /// [`ErrorKind::InvalidParameters`](crate::error::ErrorKind::InvalidParameters) for unusable
    /// parameters.
    pub fn from_data(data: Vec<u8>, entries: u32, error_rate: f64) -> Result<Self, Error> {
        BloomFilterBuilder::with_accuracy(entries, error_rate)
            .data(data)
            .build()
    }

    // ========================================================================
    // Query and Update Operations
    // ========================================================================

    /// Tests whether a key is possibly in the set.
    ///
    /// Returns:
    /// - `true`: the key was **possibly** added (or this is a false positive)
    /// - `false`: the key was **definitely not** added
    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        self.bit_positions(key.as_ref())
            .all(|(byte, mask)| self.bit_array[byte] & mask != 0)
    }

    /// Adds a key to the filter.
    ///
    /// Returns whether every addressed bit was already set, i.e. whether the key looked present
    /// before this call. This is subject to the same false positives as
    /// [`contains()`](Self::contains) and is not a reliable duplicate check on a full filter.
    ///
    /// # Examples
    ///
    /// ```
    /// # use inbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(100, 0.01).unwrap();
    ///
    /// assert!(!filter.add("apple")); // first insertion
    /// assert!(filter.add("apple")); // already there
    /// ```
    pub fn add(&mut self, key: impl AsRef<[u8]>) -> bool {
        let mut hits = 0;
        for (byte, mask) in self.bit_positions(key.as_ref()) {
            if self.bit_array[byte] & mask != 0 {
                hits += 1;
            } else {
                self.bit_array[byte] |= mask;
            }
        }
        hits == self.num_hashes
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Returns the number of bytes in the bit array.
    pub fn len_bytes(&self) -> usize {
        self.bit_array.len()
    }

    /// Returns the expected number of keys the filter was sized for.
    pub fn entries(&self) -> u32 {
        self.entries
    }

    /// Returns the target false positive probability.
    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Returns the number of bits spent per expected key.
    pub fn bits_per_element(&self) -> f64 {
        self.bits_per_element
    }

    /// Returns the number of addressable bits.
    ///
    /// The bit array may carry up to 7 padding bits past this count.
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Returns the number of bits addressed per key.
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Returns the raw bit array.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bit_array
    }

    /// Consumes the filter and returns the raw bit array.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bit_array
    }

    /// Returns the 16-bit checksum of the bit array, as written in the serialized header.
    pub fn checksum(&self) -> u16 {
        compute_checksum(&self.bit_array)
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serializes the filter: an 8-byte big-endian header (checksum, error rate code,
    /// entries) followed by the bit array.
    ///
    /// The error rate is stored as `round(1 / error_rate)` in 16 bits, so only rates with a
    /// small integer reciprocal survive the round trip exactly. The Go, Java and C encoders
    /// truncate the reciprocal instead, so a rate of 0.15 is written as 7 here and 6 there.
    ///
    /// # Examples
    ///
    /// ```
    /// # use inbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(20, 0.01).unwrap();
    /// filter.add("abc");
    ///
    /// let bytes = filter.serialize();
    /// assert_eq!(bytes.len(), 8 + filter.len_bytes());
    ///
    /// let restored = BloomFilter::deserialize(&bytes).unwrap();
    /// assert_eq!(filter, restored);
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = FilterBytes::with_capacity(HEADER_SIZE + self.bit_array.len());
        bytes.write_u16_be(self.checksum());
        bytes.write_u16_be(encode_error_rate(self.error_rate));
        bytes.write_u32_be(self.entries);
        bytes.write(&self.bit_array);
        bytes.into_bytes()
    }

    /// Deserializes a filter produced by [`serialize()`](Self::serialize) or by another inbloom
    /// implementation.
    ///
    /// # Errors
    ///
    /// - [`TooShort`](crate::error::ErrorKind::TooShort) if `bytes` cannot hold the header
    /// - [`ZeroErrorRate`](crate::error::ErrorKind::ZeroErrorRate) if the error rate code is 0
    /// - [`InvalidParameters`](crate::error::ErrorKind::InvalidParameters) if the header
    ///   describes an unusable filter
    /// - [`SizeMismatch`](crate::error::ErrorKind::SizeMismatch) if the payload length does not
    ///   match the header
    /// - [`BadChecksum`](crate::error::ErrorKind::BadChecksum) if the payload is corrupted
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < HEADER_SIZE {
            debug!(len = bytes.len(), "rejecting serialized filter: too short");
            return Err(Error::too_short(HEADER_SIZE, bytes.len()));
        }

        let mut cursor = FilterSlice::new(bytes);
        let insufficient = |_: std::io::Error| Error::too_short(HEADER_SIZE, bytes.len());
        let checksum = cursor.read_u16_be().map_err(insufficient)?;
        let error_rate_code = cursor.read_u16_be().map_err(insufficient)?;
        let entries = cursor.read_u32_be().map_err(insufficient)?;

        if error_rate_code == 0 {
            debug!(entries, "rejecting serialized filter: zero error rate");
            return Err(Error::zero_error_rate());
        }

        let data = cursor.read_remaining().map_err(insufficient)?;
        let filter = BloomFilter::from_data(data, entries, decode_error_rate(error_rate_code))
            .inspect_err(|err| {
                debug!(
                    entries,
                    error_rate_code,
                    kind = %err.kind(),
                    "rejecting serialized filter: header does not match payload"
                )
            })?;

        let actual = filter.checksum();
        if actual != checksum {
            debug!(
                expected = checksum,
                actual,
                "rejecting serialized filter: checksum mismatch"
            );
            return Err(Error::bad_checksum(checksum, actual));
        }

        Ok(filter)
    }

    /// Serializes the filter and encodes it as URL-safe base64 with padding.
    ///
    /// # Examples
    ///
    /// ```
    /// # use inbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(20, 0.01).unwrap();
    /// filter.add("foo");
    ///
    /// let text = filter.serialize_base64();
    /// let restored = BloomFilter::deserialize_base64(&text).unwrap();
    /// assert!(restored.contains("foo"));
    /// ```
    pub fn serialize_base64(&self) -> String {
        self.serialize_base64_with(&URL_SAFE)
    }

    /// Serializes the filter and encodes it with the given base64 engine.
    pub fn serialize_base64_with<E: Engine>(&self, engine: &E) -> String {
        engine.encode(self.serialize())
    }

    /// Decodes URL-safe base64 text and deserializes the filter it holds.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidEncoding`](crate::error::ErrorKind::InvalidEncoding) if the
    /// text is not valid base64, otherwise any error of [`deserialize()`](Self::deserialize).
    pub fn deserialize_base64(text: &str) -> Result<Self, Error> {
        Self::deserialize_base64_with(text, &URL_SAFE)
    }

    /// Decodes text with the given base64 engine and deserializes the filter it holds.
    pub fn deserialize_base64_with<E: Engine>(text: &str, engine: &E) -> Result<Self, Error> {
        let bytes = engine.decode(text).map_err(|err| {
            Error::invalid_encoding("could not decode base64 data").set_source(err)
        })?;
        Self::deserialize(&bytes)
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Returns the bit positions of `key` as `(byte index, bit mask)` pairs.
    fn bit_positions(&self, key: &[u8]) -> BitPositions {
        let a = murmur2_32(key, DEFAULT_SEED);
        let b = murmur2_32(key, a);
        BitPositions {
            a,
            b,
            num_bits: self.num_bits,
            num_hashes: self.num_hashes,
            i: 0,
        }
    }
}

/// Double hashing (Kirsch-Mitzenmacher): position `i` is `(a + i * b) mod 2^32 mod num_bits`.
struct BitPositions {
    a: u32,
    b: u32,
    num_bits: u32,
    num_hashes: u32,
    i: u32,
}

impl Iterator for BitPositions {
    type Item = (usize, u8);

    fn next(&mut self) -> Option<Self::Item> {
        if self.i >= self.num_hashes {
            return None;
        }
        let x = self.a.wrapping_add(self.i.wrapping_mul(self.b)) % self.num_bits;
        self.i += 1;
        Some(((x >> 3) as usize, 1u8 << (x % 8)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.num_hashes - self.i) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitPositions {}

// ============================================================================
// Tests
// ============================================================================
