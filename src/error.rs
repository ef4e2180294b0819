// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `fs20_lib` library.
//!
//! Frame and value errors are expected during normal operation (the radio
//! gateway relays noise and truncated lines) and are absorbed by the driver.
//! Only configuration loading and stream I/O surface errors to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A received line could not be turned into a frame.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// A value failed validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Reading from the line stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while decoding a received line into a frame.
///
/// Every variant means "not loaded": the line is dropped and no device
/// state is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The line was empty after stripping the line delimiter.
    #[error("empty line")]
    Empty,

    /// The payload has an odd number of hex digits.
    #[error("odd number of hex digits after header: {digits}")]
    OddLength {
        /// Number of hex digits following the header.
        digits: usize,
    },

    /// The payload contains a character that is not a hex digit.
    #[error("invalid hex digit {found:?} at position {position}")]
    InvalidHexDigit {
        /// Position of the offending character, counting the header as 0.
        position: usize,
        /// The offending character.
        found: char,
    },
}

/// Errors related to value validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A device identity string is malformed.
    #[error("invalid device identity: {0}")]
    InvalidIdentity(String),

    /// A header or family character names no supported device family.
    #[error("unknown device family: {0:?}")]
    UnknownFamily(char),
}

/// Errors related to loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document is not valid JSON for the expected shape.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
