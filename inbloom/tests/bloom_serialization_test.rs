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
use base64::engine::general_purpose::STANDARD;
use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::eq;
use inbloom::bloom::BloomFilter;
use inbloom::error::ErrorKind;

// Serialized 20 / 0.01 filter holding "foo" and "bar".
const FOO_BAR_SERIALIZED: &str =
    "a14e006400000014000000000042000011001804000200200000301000090000";

// Serialized 20 / 0.01 filter holding "abc", as produced by the Java and Python libraries.
const ABC_SERIALIZED: &str = "620d006400000014000000000020001000080000000000002000100008000400";

fn foo_bar_filter() -> BloomFilter {
    let mut filter = BloomFilter::new(20, 0.01).unwrap();
    filter.add("foo");
    filter.add("bar");
    filter
}

#[test]
fn test_serialize_golden_bytes() {
    let filter = foo_bar_filter();
    let bytes = filter.serialize();
    assert_eq!(hex::encode(&bytes), FOO_BAR_SERIALIZED);
    assert_eq!(filter.checksum(), 0xa14e);
}

#[test]
fn test_deserialize_foreign_payload() {
    let bytes = hex::decode(ABC_SERIALIZED).unwrap();
    let filter = BloomFilter::deserialize(&bytes).unwrap();

    assert_eq!(filter.entries(), 20);
    assert_eq!(filter.error_rate(), 0.01);
    assert!(filter.contains("abc"));
    assert_eq!(hex::encode(filter.serialize()), ABC_SERIALIZED);

    let mut local = BloomFilter::new(20, 0.01).unwrap();
    local.add("abc");
    assert_eq!(local, filter);
}

#[test]
fn test_round_trip_preserves_everything() {
    let mut filter = BloomFilter::new(500, 0.001).unwrap();
    for i in 0..300u32 {
        filter.add(format!("item-{i}"));
    }

    let restored = BloomFilter::deserialize(&filter.serialize()).unwrap();
    assert_eq!(restored.entries(), filter.entries());
    assert_eq!(restored.error_rate(), filter.error_rate());
    assert_eq!(restored.num_bits(), filter.num_bits());
    assert_eq!(restored.len_bytes(), filter.len_bytes());
    assert_eq!(restored.num_hashes(), filter.num_hashes());
    assert_eq!(restored.as_bytes(), filter.as_bytes());
    for i in 0..1000u32 {
        let key = format!("item-{i}");
        assert_eq!(restored.contains(&key), filter.contains(&key), "{key}");
    }
}

#[test]
fn test_round_trip_empty_filter() {
    let filter = BloomFilter::new(1, 0.1).unwrap();
    let bytes = filter.serialize();
    assert_eq!(bytes.len(), 9);
    assert_eq!(BloomFilter::deserialize(&bytes).unwrap(), filter);
}

#[test]
fn test_too_short() {
    let bytes = foo_bar_filter().serialize();
    for len in [0, 1, 4, 7] {
        let err = BloomFilter::deserialize(&bytes[..len]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooShort, "len {len}");
        assert_that!(err.message(), contains_substring("incomplete payload"));
    }
}

#[test]
fn test_header_only_is_size_mismatch() {
    let bytes = foo_bar_filter().serialize();
    let err = BloomFilter::deserialize(&bytes[..8]).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::SizeMismatch));
}

#[test]
fn test_truncated_payload() {
    let bytes = foo_bar_filter().serialize();
    let err = BloomFilter::deserialize(&bytes[..bytes.len() - 1]).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::SizeMismatch));
    assert_eq!(err.context_value("expected"), Some("24"));
    assert_eq!(err.context_value("actual"), Some("23"));
}

#[test]
fn test_overwritten_checksum() {
    let mut bytes = foo_bar_filter().serialize();
    bytes[0] = 0xff;
    bytes[1] = 0xff;
    let err = BloomFilter::deserialize(&bytes).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::BadChecksum));
    assert_that!(err.message(), contains_substring("checksum mismatch"));
}

#[test]
fn test_flipped_header_bytes_are_detected() {
    let bytes = foo_bar_filter().serialize();
    for i in 0..8 {
        let mut corrupted = bytes.clone();
        corrupted[i] ^= 0xff;
        let err = BloomFilter::deserialize(&corrupted).unwrap_err();
        assert!(
            matches!(err.kind(), ErrorKind::BadChecksum | ErrorKind::SizeMismatch),
            "byte {i}: {err}"
        );
    }
}

#[test]
fn test_flipped_payload_bytes_are_detected() {
    let bytes = foo_bar_filter().serialize();
    for i in 8..bytes.len() {
        let mut corrupted = bytes.clone();
        corrupted[i] ^= 0x01;
        let err = BloomFilter::deserialize(&corrupted).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadChecksum, "byte {i}");
    }
}

#[test]
fn test_zero_error_rate() {
    let mut bytes = foo_bar_filter().serialize();
    bytes[2..4].copy_from_slice(&[0, 0]);
    let err = BloomFilter::deserialize(&bytes).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::ZeroErrorRate));
}

#[test]
fn test_lossy_error_rate() {
    // 1 / 0.03 = 33.3, stored as 33, which derives a 91 byte payload instead of 92
    let filter = BloomFilter::new(100, 0.03).unwrap();
    let bytes = filter.serialize();
    assert_eq!(&bytes[2..4], &[0, 33]);
    assert_eq!(filter.len_bytes(), 92);

    let err = BloomFilter::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SizeMismatch);
    assert_eq!(err.context_value("expected"), Some("91"));
    assert_eq!(err.context_value("actual"), Some("92"));
}

#[test]
fn test_lossy_error_rate_same_size() {
    // 1 / 33 derives the same 145 bits and 6 hashes as 0.03 for 20 entries
    let mut filter = BloomFilter::new(20, 0.03).unwrap();
    filter.add("foo");
    filter.add("bar");

    let restored = BloomFilter::deserialize(&filter.serialize()).unwrap();
    assert_eq!(restored.error_rate(), 1.0 / 33.0);
    assert_eq!(restored.num_bits(), filter.num_bits());
    assert_eq!(restored.num_hashes(), filter.num_hashes());
    assert_eq!(restored.as_bytes(), filter.as_bytes());
    assert!(restored.contains("foo"));
    assert!(restored.contains("bar"));
}

#[test]
fn test_base64_round_trip() {
    let filter = foo_bar_filter();
    let text = filter.serialize_base64();
    assert_eq!(text, "oU4AZAAAABQAAAAAAEIAABEAGAQAAgAgAAAwEAAJAAA=");

    let restored = BloomFilter::deserialize_base64(&text).unwrap();
    assert_eq!(restored, filter);
}

#[test]
fn test_base64_with_engine() {
    let filter = foo_bar_filter();
    let text = filter.serialize_base64_with(&STANDARD);
    assert_eq!(STANDARD.decode(&text).unwrap(), filter.serialize());

    let restored = BloomFilter::deserialize_base64_with(&text, &STANDARD).unwrap();
    assert_eq!(restored, filter);
}

#[test]
fn test_base64_invalid_text() {
    let err = BloomFilter::deserialize_base64("@@@@").unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::InvalidEncoding));

    // valid base64, but not a filter
    let err = BloomFilter::deserialize_base64("AAAA").unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::TooShort));
}
