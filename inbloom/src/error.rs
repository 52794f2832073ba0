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

//! Error types for inbloom operations

use std::fmt;

/// ErrorKind is all kinds of Error of inbloom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The entries or error rate given for a filter are unusable.
    InvalidParameters,
    /// A bit buffer does not have the length derived from the filter parameters.
    SizeMismatch,
    /// The serialized data is shorter than the fixed header.
    TooShort,
    /// The serialized header encodes an error rate of zero.
    ZeroErrorRate,
    /// The checksum in the serialized header does not match the bit buffer.
    BadChecksum,
    /// The text form of a serialized filter could not be decoded.
    InvalidEncoding,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::InvalidParameters => "InvalidParameters",
            ErrorKind::SizeMismatch => "SizeMismatch",
            ErrorKind::TooShort => "TooShort",
            ErrorKind::ZeroErrorRate => "ZeroErrorRate",
            ErrorKind::BadChecksum => "BadChecksum",
            ErrorKind::InvalidEncoding => "InvalidEncoding",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

/// Error is the error struct returned by all inbloom functions.
///
/// # Examples
///
/// ```
/// # use inbloom::error::Error;
/// # use inbloom::error::ErrorKind;
/// let err = Error::new(ErrorKind::BadChecksum, "checksum mismatch");
/// assert_eq!(err.kind(), ErrorKind::BadChecksum);
/// assert_eq!(err.message(), "checksum mismatch");
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: vec![],
            source: None,
        }
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Set source for error.
    ///
    /// # Panics
    ///
    /// Panics if the source has been set.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::error::Error as _;
    /// use inbloom::error::{Error, ErrorKind};
    ///
    /// let mut error = Error::new(ErrorKind::InvalidEncoding, "failed to decode filter");
    /// assert!(error.source().is_none());
    /// error = error.set_source(std::io::Error::new(std::io::ErrorKind::Other, "IO error"));
    /// assert!(error.source().is_some());
    /// ```
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        assert!(self.source.is_none(), "the source error has been set");
        self.source = Some(src.into());
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Return the value recorded under `key` in the error context, if any.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

// Convenient constructors used within inbloom crate.
impl Error {
    pub(crate) fn invalid_parameters(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParameters, msg)
    }

    pub(crate) fn size_mismatch(expected: usize, actual: usize) -> Self {
        Self::new(
            ErrorKind::SizeMismatch,
            format!("expected {expected} bytes, got {actual}"),
        )
        .with_context("expected", expected)
        .with_context("actual", actual)
    }

    pub(crate) fn too_short(header_len: usize, actual: usize) -> Self {
        Self::new(
            ErrorKind::TooShort,
            format!("incomplete payload: need at least {header_len} bytes, got {actual}"),
        )
    }

    pub(crate) fn zero_error_rate() -> Self {
        Self::new(ErrorKind::ZeroErrorRate, "error rate cannot be 0")
    }

    pub(crate) fn bad_checksum(expected: u16, actual: u16) -> Self {
        Self::new(ErrorKind::BadChecksum, "checksum mismatch")
            .with_context("expected", format!("{expected:#06x}"))
            .with_context("actual", format!("{actual:#06x}"))
    }

    pub(crate) fn invalid_encoding(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidEncoding, msg)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            de.field("source", &self.source);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "Source:")?;
            writeln!(f, "   {source:#}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            for (i, (k, v)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}: {v}")?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|v| v.as_ref())
    }
}
