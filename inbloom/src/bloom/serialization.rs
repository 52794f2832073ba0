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

// Serialization layout (compatible with the Go, Java, C and Python inbloom libraries):
//
// offset | size | field
// -------+------+-----------------------------------------------
//      0 |    2 | checksum, XOR-folded CRC-32 of the bit array
//      2 |    2 | error rate code, round(1 / error_rate)
//      4 |    4 | entries
//      8 |    N | bit array
//
// All header fields are big-endian.

pub(super) const HEADER_SIZE: usize = 8;

/// Computes the 16-bit checksum stored in the header: the IEEE CRC-32 of `data` with its high
/// and low halves XOR-ed together.
pub(super) fn compute_checksum(data: &[u8]) -> u16 {
    let crc = crc32fast::hash(data);
    ((crc & 0xffff) as u16) ^ ((crc >> 16) as u16)
}

/// Encodes an error rate as the reciprocal rounded to an integer, keeping the low 16 bits.
///
/// Rates whose reciprocal is not an integer, or exceeds `u16::MAX`, do not survive a round trip.
pub(super) fn encode_error_rate(error_rate: f64) -> u16 {
    (1.0 / error_rate).round() as u64 as u16
}

pub(super) fn decode_error_rate(code: u16) -> f64 {
    1.0 / f64::from(code)
}
