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

use tracing::debug;

use crate::bloom::BloomFilter;
use crate::error::Error;

/// `ln(2)^2`, truncated the same way in every inbloom implementation.
const LN_2_SQUARED: f64 = 0.480453013918201;
/// `ln(2)`, truncated the same way in every inbloom implementation.
#[allow(clippy::approx_constant)]
const LN_2: f64 = 0.693147180559945;

/// Builder for creating [`BloomFilter`] instances.
///
/// A filter is fully described by its expected number of entries and its target error rate.
/// The bit count and number of hashes are derived from those two values, which is what lets a
/// serialized filter carry only them in its header.
///
/// # Examples
///
/// ```
/// use inbloom::bloom::BloomFilterBuilder;
///
/// let mut filter = BloomFilterBuilder::with_accuracy(20, 0.01).build().unwrap();
/// filter.add("foo");
/// assert!(filter.contains("foo"));
/// assert_eq!(filter.len_bytes(), 24);
/// ```
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder {
    entries: u32,
    error_rate: f64,
    data: Option<Vec<u8>>,
}

impl BloomFilterBuilder {
    /// Creates a builder for a filter holding about `entries` keys with a false positive
    /// probability of `error_rate`.
    ///
    /// Parameters are validated by [`build()`](Self::build).
    pub fn with_accuracy(entries: u32, error_rate: f64) -> Self {
        BloomFilterBuilder {
            entries,
            error_rate,
            data: None,
        }
    }

    /// Uses `data` as the bit array instead of allocating an empty one.
    ///
    /// The buffer is typically the raw bit array of a filter built by another inbloom
    /// implementation with the same entries and error rate. Its length must equal the derived
    /// byte length.
    pub fn data(mut self, data: Vec<u8>) -> Self {
        self.data = Some(data);
        self
    }

    /// Builds the Bloom filter.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameters`](crate::error::ErrorKind::InvalidParameters) if
    /// `entries` is 0, the error rate is not within (0, 1), or the derived bit count is 0 or
    /// does not fit in 32 bits.
    ///
    /// Returns [`ErrorKind::SizeMismatch`](crate::error::ErrorKind::SizeMismatch) if a buffer
    /// was supplied and its length differs from the derived byte length.
    pub fn build(self) -> Result<BloomFilter, Error> {
        let BloomFilterBuilder {
            entries,
            error_rate,
            data,
        } = self;

        validate_params(entries, error_rate)?;

        let bits_per_element = Self::suggest_bits_per_element(error_rate);
        let num_bits = Self::suggest_num_bits(entries, error_rate);
        let num_bytes = num_bits.div_ceil(8);

        // The length check runs before the range checks so that a corrupted header reports
        // the buffer it disagrees with.
        if let Some(data) = &data {
            if num_bytes != data.len() as u64 {
                return Err(Error::size_mismatch(num_bytes as usize, data.len()));
            }
        }

        if num_bits == 0 {
            let msg = "entries and error rate yield no bits";
            return Err(params_error(msg, entries, error_rate));
        }
        let num_bits = u32::try_from(num_bits).map_err(|_| {
            let msg = format!("filter needs {num_bits} bits, above the 32-bit limit");
            params_error(msg, entries, error_rate)
        })?;
        let num_hashes = Self::suggest_num_hashes(error_rate);

        let bit_array = data.unwrap_or_else(|| vec![0u8; num_bytes as usize]);

        debug!(
            entries,
            error_rate,
            num_bits,
            num_hashes,
            num_bytes,
            "built bloom filter"
        );

        Ok(BloomFilter {
            entries,
            error_rate,
            bits_per_element,
            num_bits,
            num_hashes,
            bit_array,
        })
    }

    // ========================================================================
    // Static Suggestion Methods
    // ========================================================================

    /// Returns the number of bits spent per expected entry for a target error rate.
    ///
    /// Formula: `-ln(p) / ln(2)^2`
    pub fn suggest_bits_per_element(error_rate: f64) -> f64 {
        -(error_rate.ln() / LN_2_SQUARED)
    }

    /// Returns the total number of bits for `entries` keys at a target error rate.
    ///
    /// Formula: `floor(n * -ln(p) / ln(2)^2)`
    ///
    /// # Examples
    ///
    /// ```
    /// # use inbloom::bloom::BloomFilterBuilder;
    /// assert_eq!(BloomFilterBuilder::suggest_num_bits(20, 0.01), 191);
    /// assert_eq!(BloomFilterBuilder::suggest_num_bits(1000, 0.01), 9585);
    /// ```
    pub fn suggest_num_bits(entries: u32, error_rate: f64) -> u64 {
        (f64::from(entries) * Self::suggest_bits_per_element(error_rate)) as u64
    }

    /// Returns the number of hash positions per key for a target error rate.
    ///
    /// Formula: `ceil(ln(2) * bits_per_element)`
    ///
    /// # Examples
    ///
    /// ```
    /// # use inbloom::bloom::BloomFilterBuilder;
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes(0.01), 7);
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes(0.000001), 20);
    /// ```
    pub fn suggest_num_hashes(error_rate: f64) -> u32 {
        (LN_2 * Self::suggest_bits_per_element(error_rate)).ceil() as u32
    }
}

fn validate_params(entries: u32, error_rate: f64) -> Result<(), Error> {
    if entries < 1 {
        let err = Error::invalid_parameters("entries must be at least 1");
        return Err(err.with_context("entries", entries));
    }
    // also rejects NaN
    if !(error_rate > 0.0 && error_rate < 1.0) {
        let err = Error::invalid_parameters("error rate must be between 0.0 and 1.0 (exclusive)");
        return Err(err.with_context("error_rate", error_rate));
    }
    Ok(())
}

fn params_error(msg: impl Into<String>, entries: u32, error_rate: f64) -> Error {
    Error::invalid_parameters(msg)
        .with_context("entries", entries)
        .with_context("error_rate", error_rate)
}
