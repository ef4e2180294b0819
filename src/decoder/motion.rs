// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PIRI motion sensor decoder.

use crate::frame::ByteFrame;
use crate::types::{Family, Readings, names};

use super::{DeviceDecoder, show};

const BRIGHTNESS_INDEX: usize = 5;

/// Decoder for motion sensor frames (`F`).
///
/// The only reading is the ambient brightness in byte 5, passed through
/// untransformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionSensorDecoder;

impl DeviceDecoder for MotionSensorDecoder {
    fn family(&self) -> Family {
        Family::MotionSensor
    }

    fn decode(&self, frame: &ByteFrame, _prior: &Readings) -> Readings {
        let mut readings = Readings::new();
        if let Some(brightness) = frame.get(BRIGHTNESS_INDEX) {
            readings.set(names::BRIGHTNESS, brightness);
        }
        readings
    }

    fn describe(&self, frame: &ByteFrame) -> String {
        format!("Brightness: {}", show(frame.get(BRIGHTNESS_INDEX)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_from_byte_five() {
        let frame = ByteFrame::parse("F1a2b0000003c").unwrap();
        let readings = MotionSensorDecoder.decode(&frame, &Readings::new());
        assert_eq!(readings.number(names::BRIGHTNESS), Some(60.0));
        assert_eq!(readings.len(), 1);
        assert_eq!(MotionSensorDecoder.describe(&frame), "Brightness: 60");
    }

    #[test]
    fn short_frame_has_no_brightness() {
        let frame = ByteFrame::parse("F1a2b0000").unwrap();
        assert!(MotionSensorDecoder.decode(&frame, &Readings::new()).is_empty());
        assert_eq!(MotionSensorDecoder.describe(&frame), "Brightness: -");
    }
}
