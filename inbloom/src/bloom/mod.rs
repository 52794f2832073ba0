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

//! Portable Bloom filter for probabilistic set membership testing.
//!
//! A Bloom filter answers either "possibly in the set" or "definitely not in the set". This one
//! fixes its hash function, bit addressing and serialized form so that the Go, Java, C and Python
//! inbloom libraries produce and accept the same bytes: a filter built on one side can be
//! shipped over the network and queried on the other.
//!
//! # Properties
//!
//! - **No false negatives**: once added, a key is always reported present
//! - **Possible false positives**: close to the configured error rate up to `entries` keys
//! - **Fixed size**: the filter never grows, and bits are never cleared
//!
//! # Usage
//!
//! ```rust
//! use inbloom::bloom::BloomFilter;
//!
//! let mut filter = BloomFilter::new(20, 0.01).unwrap();
//! filter.add("foo");
//! filter.add("bar");
//!
//! assert!(filter.contains("foo"));
//! assert!(!filter.contains("wat")); // never added (probably)
//! assert_eq!(filter.len_bytes(), 24);
//! ```
//!
//! # Exchanging Filters
//!
//! The serialized form carries the checksum, error rate and entries, so the receiver does not
//! need to know the parameters up front:
//!
//! ```rust
//! # use inbloom::bloom::BloomFilter;
//! let mut filter = BloomFilter::new(1000, 0.001).unwrap();
//! filter.add("alice@example.com");
//!
//! let bytes = filter.serialize();
//! let received = BloomFilter::deserialize(&bytes).unwrap();
//! assert!(received.contains("alice@example.com"));
//!
//! // or as URL-safe text
//! let text = filter.serialize_base64();
//! let received = BloomFilter::deserialize_base64(&text).unwrap();
//! assert_eq!(received, filter);
//! ```
//!
//! A raw bit array whose parameters are known out of band can be wrapped directly:
//!
//! ```rust
//! # use inbloom::bloom::BloomFilter;
//! let raw = vec![0u8; 24];
//! let filter = BloomFilter::from_data(raw, 20, 0.01).unwrap();
//! assert!(!filter.contains("foo"));
//! ```
//!
//! # Implementation Details
//!
//! - `bits_per_element = -ln(p) / ln(2)^2`, `num_bits = floor(n * bits_per_element)`,
//!   `num_hashes = ceil(ln(2) * bits_per_element)`
//! - Two 32-bit MurmurHash2 values per key: `a` with seed `0x9747b28c`, `b` seeded with `a`
//! - Double hashing (Kirsch-Mitzenmacher method) for the k bit positions
//! - Bits packed in bytes, least significant bit first
//! - 8-byte big-endian header with an XOR-folded CRC-32 checksum
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"
//! - Kirsch and Mitzenmacher (2008). "Less Hashing, Same Performance: Building a Better Bloom
//!   Filter"

mod builder;
mod serialization;
mod sketch;

pub use self::builder::BloomFilterBuilder;
pub use self::sketch::BloomFilter;
