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

//! Hash engine shared by every inbloom implementation.
//!
//! Filters are only exchangeable between languages if they agree on the hash bit for bit, so
//! this module pins down the 32-bit MurmurHash2 variant used for double hashing, including
//! little-endian word reads and the tail-byte cascade.

mod murmurhash;

pub use self::murmurhash::MurmurHash2;
pub use self::murmurhash::murmur2_32;

/// The seed used for the first of the two hashes computed per key.
///
/// The second hash is seeded with the result of the first one. Changing this value changes the
/// bit layout of every filter, so it is part of the wire compatibility contract.
pub const DEFAULT_SEED: u32 = 0x9747b28c;
