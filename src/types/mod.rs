// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by decoders, device state and configuration.
//!
//! # Types
//!
//! - [`Family`] - Device protocol family selected by the frame header
//! - [`DeviceIdentity`] - Family-prefixed radio address of one device
//! - [`ReadingValue`] - A numeric or textual reading
//! - [`Readings`] - Name-ordered set of readings

mod family;
mod identity;
mod reading;

pub use family::Family;
pub use identity::DeviceIdentity;
pub use reading::{ReadingValue, Readings, names};
