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

use std::io;
use std::io::Cursor;
use std::io::Read;

use byteorder::BE;
use byteorder::ReadBytesExt;

/// A wrapper around a byte slice for reading the serialized header and payload.
pub(crate) struct FilterSlice<'a> {
    slice: Cursor<&'a [u8]>,
}

impl<'a> FilterSlice<'a> {
    /// Creates a new `FilterSlice` from the given byte slice.
    pub fn new(slice: &'a [u8]) -> FilterSlice<'a> {
        FilterSlice {
            slice: Cursor::new(slice),
        }
    }

    pub fn read_u16_be(&mut self) -> io::Result<u16> {
        self.slice.read_u16::<BE>()
    }

    pub fn read_u32_be(&mut self) -> io::Result<u32> {
        self.slice.read_u32::<BE>()
    }

    /// Copies every byte after the current position into a new buffer.
    pub fn read_remaining(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.slice.read_to_end(&mut buf)?;
        Ok(buf)
    }
}
