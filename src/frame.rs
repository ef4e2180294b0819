// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire frames received from the CUL gateway.
//!
//! The gateway relays each radio packet as one ASCII line: a single header
//! character naming the device family followed by hex digit pairs, most
//! significant nibble first.
//!
//! ```text
//! K 00 23 01 45\r\n
//! │ └─── payload bytes 0..3
//! └───── header (weather station)
//! ```
//!
//! # Examples
//!
//! ```
//! use fs20_lib::frame::ByteFrame;
//!
//! let frame = ByteFrame::parse("K00230145").unwrap();
//! assert_eq!(frame.header(), 'K');
//! assert_eq!(frame.get(1), Some(0x23));
//! assert_eq!(frame.get(9), None);
//! assert_eq!(frame.to_string(), "K00230145");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::FrameError;

/// One decoded radio packet: a header character and its payload bytes.
///
/// Payload indices are relative to the byte immediately following the
/// header. Frames are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ByteFrame {
    header: char,
    payload: Vec<u8>,
}

impl ByteFrame {
    /// Creates a frame from an already decoded header and payload.
    #[must_use]
    pub fn new(header: char, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            header,
            payload: payload.into(),
        }
    }

    /// Parses a received text line.
    ///
    /// A trailing `\r\n` delimiter is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Empty`] for an empty line,
    /// [`FrameError::OddLength`] when the payload holds an odd number of
    /// digits, and [`FrameError::InvalidHexDigit`] for any non-hex payload
    /// character.
    pub fn parse(line: &str) -> Result<Self, FrameError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut chars = line.chars();
        let header = chars.next().ok_or(FrameError::Empty)?;
        let payload = decode_hex_pairs(chars)?;
        Ok(Self { header, payload })
    }

    /// Parses a raw byte buffer as delivered by a byte-oriented transport.
    ///
    /// The first byte is the literal start marker (the header); every
    /// following byte is one ASCII hex digit, paired into payload bytes.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ByteFrame::parse`].
    pub fn from_bytes(raw: &[u8]) -> Result<Self, FrameError> {
        let end = raw
            .iter()
            .rposition(|b| !matches!(b, b'\r' | b'\n'))
            .map_or(0, |i| i + 1);
        let (&first, rest) = raw[..end].split_first().ok_or(FrameError::Empty)?;
        let payload = decode_hex_pairs(rest.iter().copied().map(char::from))?;
        Ok(Self {
            header: char::from(first),
            payload,
        })
    }

    /// Returns the header character selecting the device family.
    #[must_use]
    pub fn header(&self) -> char {
        self.header
    }

    /// Returns the payload byte at `index`, or `None` when the frame is
    /// too short.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.payload.get(index).copied()
    }

    /// Returns the little-endian 16-bit value stored at `index` and
    /// `index + 1`.
    #[must_use]
    pub fn get_u16_le(&self, index: usize) -> Option<u16> {
        let low = self.get(index)?;
        let high = self.get(index + 1)?;
        Some(u16::from_le_bytes([low, high]))
    }

    /// Returns all payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the number of payload bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Returns `true` if the frame carries no payload bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl fmt::Display for ByteFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header)?;
        for byte in &self.payload {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for ByteFrame {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Pairs hex digits into bytes. Positions in errors count the header as 0.
fn decode_hex_pairs(digits: impl Iterator<Item = char>) -> Result<Vec<u8>, FrameError> {
    let digits: Vec<char> = digits.collect();
    if digits.len() % 2 != 0 {
        return Err(FrameError::OddLength {
            digits: digits.len(),
        });
    }

    digits
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let high = nibble(pair[0], 2 * i + 1)?;
            let low = nibble(pair[1], 2 * i + 2)?;
            Ok((high << 4) | low)
        })
        .collect()
}

fn nibble(c: char, position: usize) -> Result<u8, FrameError> {
    c.to_digit(16)
        .and_then(|d| u8::try_from(d).ok())
        .ok_or(FrameError::InvalidHexDigit { position, found: c })
}
