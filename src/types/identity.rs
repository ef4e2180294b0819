// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identity type.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

use super::Family;

/// The radio address of one physical device, prefixed with its family.
///
/// Identities are stored lowercase, so equality is case-insensitive with
/// respect to the strings they were built from.
///
/// # Examples
///
/// ```
/// use fs20_lib::types::DeviceIdentity;
///
/// let configured: DeviceIdentity = "K01".parse().unwrap();
/// let derived = DeviceIdentity::derive('K', &[0x01]);
/// assert_eq!(configured, derived);
/// assert_eq!(derived.as_str(), "k01");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    /// Builds the identity of a received frame from its header and the
    /// address bytes present in its payload.
    ///
    /// An empty address yields the bare header.
    #[must_use]
    pub fn derive(header: char, address: &[u8]) -> Self {
        use fmt::Write as _;

        let mut id = String::with_capacity(1 + address.len() * 2);
        id.push(header.to_ascii_lowercase());
        for byte in address {
            // Writing to a String cannot fail.
            let _ = write!(id, "{byte:02x}");
        }
        Self(id)
    }

    /// Parses a configured identity such as `k01` or `T1A2B`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::UnknownFamily`] if the first character names no
    /// family and [`ValueError::InvalidIdentity`] unless it is followed by
    /// exactly one or two hex-encoded address bytes.
    pub fn parse(s: &str) -> Result<Self, ValueError> {
        let mut chars = s.chars();
        let first = chars
            .next()
            .ok_or_else(|| ValueError::InvalidIdentity(s.to_string()))?;
        let family = Family::from_header(first.to_ascii_uppercase())
            .ok_or(ValueError::UnknownFamily(first))?;

        let address = chars.as_str();
        let valid_width = address.len() == 2 || address.len() == family.address_len() * 2;
        if !valid_width || !address.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValueError::InvalidIdentity(s.to_string()));
        }

        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Returns the normalised identity string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the family named by the identity prefix.
    #[must_use]
    pub fn family(&self) -> Option<Family> {
        self.0
            .chars()
            .next()
            .and_then(|c| Family::from_header(c.to_ascii_uppercase()))
    }

    /// Compares against an arbitrary identity string, ignoring case.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeviceIdentity {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DeviceIdentity {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DeviceIdentity> for String {
    fn from(id: DeviceIdentity) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_zero_pads_address_bytes() {
        let id = DeviceIdentity::derive('T', &[0x0a, 0x01]);
        assert_eq!(id.as_str(), "t0a01");
        assert_eq!(id.family(), Some(Family::Thermostat));
    }

    #[test]
    fn derive_without_address_is_bare_header() {
        assert_eq!(DeviceIdentity::derive('E', &[]).as_str(), "e");
    }

    #[test]
    fn parse_normalises_case() {
        let id: DeviceIdentity = "EA1B2".parse().unwrap();
        assert_eq!(id.as_str(), "ea1b2");
        assert!(id.matches("Ea1B2"));
    }

    #[test]
    fn parse_accepts_one_or_two_address_bytes() {
        assert!(DeviceIdentity::parse("t01").is_ok());
        assert!(DeviceIdentity::parse("t0102").is_ok());
        assert!(DeviceIdentity::parse("k01").is_ok());
    }

    #[test]
    fn parse_rejects_malformed_identities() {
        assert_eq!(
            DeviceIdentity::parse(""),
            Err(ValueError::InvalidIdentity(String::new()))
        );
        assert_eq!(
            DeviceIdentity::parse("x01"),
            Err(ValueError::UnknownFamily('x'))
        );
        assert!(DeviceIdentity::parse("k").is_err());
        assert!(DeviceIdentity::parse("k0102").is_err());
        assert!(DeviceIdentity::parse("t0g").is_err());
        assert!(DeviceIdentity::parse("t010203").is_err());
    }

    #[test]
    fn deserializes_with_validation() {
        let id: DeviceIdentity = serde_json::from_str("\"F1234\"").unwrap();
        assert_eq!(id.as_str(), "f1234");
        assert!(serde_json::from_str::<DeviceIdentity>("\"zz\"").is_err());
    }
}
