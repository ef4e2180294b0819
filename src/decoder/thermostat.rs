// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! FHT thermostat and valve actuator decoder.
//!
//! Byte 2 of the payload is the function code. Codes 0-8 address valve
//! actuators (0 broadcasts to all of them) and carry a status nibble in
//! byte 3 and a parameter in byte 4. Higher codes select a single-byte
//! value in byte 4.
//!
//! The measured room temperature is split over two consecutive messages,
//! low byte first. The low byte is stored with the device values and
//! combined when the high byte arrives.

use std::fmt;

use crate::frame::ByteFrame;
use crate::types::{Family, Readings, names};

use super::{DeviceDecoder, round_tenth, show};

const FUNC_INDEX: usize = 2;
const STATUS_INDEX: usize = 3;
const PARAM_INDEX: usize = 4;

/// Highest function code addressing an actuator.
const MAX_ACTUATOR: u8 = 8;

const DESIRED_TEMP: u8 = 0x41;
const MEASURED_TEMP_LOW: u8 = 0x42;
const MEASURED_TEMP_HIGH: u8 = 0x43;
const WARNINGS: u8 = 0x44;
const ACK: u8 = 0x4b;
const CAN_XMIT: u8 = 0x53;
const CAN_RCV: u8 = 0x54;
const START_TRANSMIT: u8 = 0x7d;
const END_TRANSMIT: u8 = 0x7e;
const DAY_TEMP: u8 = 0x82;
const NIGHT_TEMP: u8 = 0x84;

/// Status reported by a valve actuator in the low nibble of byte 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActuatorStatus {
    /// Synchronising; byte 4 holds the valve position.
    Sync,
    /// Valve fully open.
    FullyOpen,
    /// Valve fully closed.
    FullyClosed,
    /// Byte 4 holds the valve position.
    Position,
    /// Offset adjustment; byte 4 holds the offset.
    OffsetAdjust,
    /// Descaling run.
    Descaling,
    /// Synchronisation countdown.
    SyncCountdown,
    /// Test run.
    Test,
    /// Pairing with a thermostat.
    Pairing,
    /// Undocumented status code.
    Unknown(u8),
}

impl ActuatorStatus {
    /// Decodes the status from the low nibble of `byte`.
    #[must_use]
    pub const fn from_nibble(byte: u8) -> Self {
        match byte & 0x0f {
            0 => Self::Sync,
            1 => Self::FullyOpen,
            2 => Self::FullyClosed,
            6 => Self::Position,
            8 => Self::OffsetAdjust,
            10 => Self::Descaling,
            12 => Self::SyncCountdown,
            14 => Self::Test,
            15 => Self::Pairing,
            other => Self::Unknown(other),
        }
    }

    /// Returns `true` if messages with this status carry a valve position.
    #[must_use]
    pub const fn has_position(self) -> bool {
        matches!(self, Self::Sync | Self::Position)
    }

    /// Returns a stable label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::FullyOpen => "fully-open",
            Self::FullyClosed => "fully-closed",
            Self::Position => "position",
            Self::OffsetAdjust => "offset-adjust",
            Self::Descaling => "descaling",
            Self::SyncCountdown => "sync-countdown",
            Self::Test => "test",
            Self::Pairing => "pairing",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// One thermostat message, classified by its function code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermostatMessage {
    /// Actuator status message (function 0-8).
    Actuator {
        /// Actuator address, 0 for all actuators.
        function: u8,
        /// Decoded status nibble.
        status: ActuatorStatus,
        /// Parameter byte, if present.
        param: Option<u8>,
    },
    /// Desired temperature in half degrees.
    DesiredTemp(u8),
    /// Low byte of the measured temperature.
    MeasuredTempLow(u8),
    /// High byte of the measured temperature.
    MeasuredTempHigh(u8),
    /// Day set-point in half degrees.
    DayTemp(u8),
    /// Night set-point in half degrees.
    NightTemp(u8),
    /// Warning flags.
    Warnings(u8),
    /// Acknowledge.
    Acknowledge(u8),
    /// Can transmit.
    CanTransmit(u8),
    /// Can receive.
    CanReceive(u8),
    /// Start of transmission.
    StartTransmit(u8),
    /// End of transmission.
    EndTransmit(u8),
    /// Function code without a decoding, or a named function whose
    /// parameter byte is missing.
    Other {
        /// The function code.
        function: u8,
        /// Parameter byte, if present.
        param: Option<u8>,
    },
}

impl ThermostatMessage {
    /// Classifies a frame. Returns `None` if the function or (for actuator
    /// messages) the status byte is missing.
    #[must_use]
    pub fn parse(frame: &ByteFrame) -> Option<Self> {
        let function = frame.get(FUNC_INDEX)?;
        let param = frame.get(PARAM_INDEX);

        if function <= MAX_ACTUATOR {
            let status = ActuatorStatus::from_nibble(frame.get(STATUS_INDEX)?);
            return Some(Self::Actuator {
                function,
                status,
                param,
            });
        }

        let Some(value) = param else {
            return Some(Self::Other { function, param });
        };
        let message = match function {
            DESIRED_TEMP => Self::DesiredTemp(value),
            MEASURED_TEMP_LOW => Self::MeasuredTempLow(value),
            MEASURED_TEMP_HIGH => Self::MeasuredTempHigh(value),
            DAY_TEMP => Self::DayTemp(value),
            NIGHT_TEMP => Self::NightTemp(value),
            WARNINGS => Self::Warnings(value),
            ACK => Self::Acknowledge(value),
            CAN_XMIT => Self::CanTransmit(value),
            CAN_RCV => Self::CanReceive(value),
            START_TRANSMIT => Self::StartTransmit(value),
            END_TRANSMIT => Self::EndTransmit(value),
            _ => Self::Other { function, param },
        };
        Some(message)
    }

    /// Returns the valve opening in percent for sync and position messages.
    #[must_use]
    pub fn valve_position(&self) -> Option<f64> {
        match self {
            Self::Actuator {
                status,
                param: Some(param),
                ..
            } if status.has_position() => Some(valve_percent(*param)),
            _ => None,
        }
    }
}

impl fmt::Display for ThermostatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Actuator { status, param, .. } => match status {
                ActuatorStatus::Sync => {
                    write!(f, "Syncing, valve is at {}", show(param.map(valve_percent)))
                }
                ActuatorStatus::FullyOpen => f.write_str("Valve fully open (ON)"),
                ActuatorStatus::FullyClosed => f.write_str("Valve fully closed (OFF)"),
                ActuatorStatus::Position => {
                    write!(f, "Valve at {}", show(param.map(valve_percent)))
                }
                ActuatorStatus::OffsetAdjust => write!(f, "Offsetting {}", show(param)),
                ActuatorStatus::Descaling => f.write_str("Descaling"),
                ActuatorStatus::SyncCountdown => f.write_str("Synchronise countdown"),
                ActuatorStatus::Test => f.write_str("Test"),
                ActuatorStatus::Pairing => f.write_str("Pairing"),
                ActuatorStatus::Unknown(_) => f.write_str("Unknown"),
            },
            Self::DesiredTemp(v) => write!(f, "Desired Temp: {v}"),
            Self::MeasuredTempLow(v) => write!(f, "Temp Low: {v}"),
            Self::MeasuredTempHigh(v) => write!(f, "Temp High: {v}"),
            Self::DayTemp(v) => write!(f, "Day Temp: {v}"),
            Self::NightTemp(v) => write!(f, "Night Temp: {v}"),
            Self::Warnings(v) => write!(f, "Warnings: {v}"),
            Self::Acknowledge(v) => write!(f, "Acknowledge: {v}"),
            Self::CanTransmit(v) => write!(f, "Can transmit: {v}"),
            Self::CanReceive(v) => write!(f, "Can receive: {v}"),
            Self::StartTransmit(v) => write!(f, "Start transmit: {v}"),
            Self::EndTransmit(v) => write!(f, "End transmit: {v}"),
            Self::Other { function, param } => write!(
                f,
                "Packet not processed, function is {function:x} parameter is {}",
                show(param.map(|p| format!("{p:x}")))
            ),
        }
    }
}

/// Decoder for thermostat and actuator frames (`T`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThermostatDecoder;

impl DeviceDecoder for ThermostatDecoder {
    fn family(&self) -> Family {
        Family::Thermostat
    }

    fn decode(&self, frame: &ByteFrame, prior: &Readings) -> Readings {
        let mut readings = Readings::new();
        let Some(message) = ThermostatMessage::parse(frame) else {
            return readings;
        };

        match message {
            ThermostatMessage::Actuator { status, .. } => {
                readings.set(names::ACTUATOR_STATUS, status.as_str());
                if let Some(position) = message.valve_position() {
                    readings.set(names::VALVE_POSITION, position);
                }
            }
            ThermostatMessage::DesiredTemp(v) => readings.set(names::DESIRED_TEMP, half_degrees(v)),
            ThermostatMessage::DayTemp(v) => readings.set(names::DAY_TEMP, half_degrees(v)),
            ThermostatMessage::NightTemp(v) => readings.set(names::NIGHT_TEMP, half_degrees(v)),
            ThermostatMessage::MeasuredTempLow(low) => readings.set(names::LOW_TEMP, low),
            ThermostatMessage::MeasuredTempHigh(high) => {
                // The low byte arrives in the preceding message; 0 if it never did.
                let low = prior.number(names::LOW_TEMP).unwrap_or(0.0);
                readings.set(names::HIGH_TEMP, high);
                readings.set(names::TEMPERATURE, (f64::from(high) * 256.0 + low) / 10.0);
            }
            ThermostatMessage::Warnings(v) => readings.set(names::WARNINGS, v),
            ThermostatMessage::Acknowledge(v) => readings.set(names::ACKNOWLEDGE, v),
            ThermostatMessage::CanTransmit(v) => readings.set(names::CAN_TRANSMIT, v),
            ThermostatMessage::CanReceive(v) => readings.set(names::CAN_RECEIVE, v),
            ThermostatMessage::StartTransmit(v) => readings.set(names::START_TRANSMIT, v),
            ThermostatMessage::EndTransmit(v) => readings.set(names::END_TRANSMIT, v),
            ThermostatMessage::Other { .. } => {}
        }
        readings
    }

    fn describe(&self, frame: &ByteFrame) -> String {
        ThermostatMessage::parse(frame).map_or_else(
            || format!("Incomplete packet: {frame}"),
            |message| message.to_string(),
        )
    }
}

fn valve_percent(param: u8) -> f64 {
    round_tenth(f64::from(param) / 255.0 * 100.0)
}

fn half_degrees(value: u8) -> f64 {
    f64::from(value) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_with(line: &str, prior: &Readings) -> Readings {
        let frame = ByteFrame::parse(line).unwrap();
        ThermostatDecoder.decode(&frame, prior)
    }

    fn decode(line: &str) -> Readings {
        decode_with(line, &Readings::new())
    }

    #[test]
    fn status_nibble_mapping() {
        assert_eq!(ActuatorStatus::from_nibble(0xa6), ActuatorStatus::Position);
        assert_eq!(ActuatorStatus::from_nibble(0x00), ActuatorStatus::Sync);
        assert_eq!(ActuatorStatus::from_nibble(0x2f), ActuatorStatus::Pairing);
        for unknown in [3, 4, 5, 7, 9, 11, 13] {
            assert_eq!(
                ActuatorStatus::from_nibble(unknown),
                ActuatorStatus::Unknown(unknown)
            );
        }
    }

    #[test]
    fn valve_position_from_position_status() {
        let readings = decode("T1a2b000680");
        assert_eq!(readings.number(names::VALVE_POSITION), Some(50.2));
        assert_eq!(
            readings.get(names::ACTUATOR_STATUS).and_then(|v| v.as_text()),
            Some("position")
        );
    }

    #[test]
    fn valve_position_from_sync_status_on_any_actuator() {
        let readings = decode("T1a2b0810ff");
        assert_eq!(readings.number(names::VALVE_POSITION), Some(100.0));
    }

    #[test]
    fn other_statuses_carry_no_position() {
        for status in ["01", "02", "08", "0a", "0c", "0e", "0f", "03"] {
            let readings = decode(&format!("T1a2b00{status}80"));
            assert!(!readings.contains(names::VALVE_POSITION), "status {status}");
            assert!(readings.contains(names::ACTUATOR_STATUS));
        }
    }

    #[test]
    fn missing_param_skips_position() {
        let readings = decode("T1a2b0006");
        assert!(!readings.contains(names::VALVE_POSITION));
        assert!(readings.contains(names::ACTUATOR_STATUS));
    }

    #[test]
    fn set_points_have_half_degree_resolution() {
        assert_eq!(decode("T1a2b41002b").number(names::DESIRED_TEMP), Some(21.5));
        assert_eq!(decode("T1a2b820028").number(names::DAY_TEMP), Some(20.0));
        assert_eq!(decode("T1a2b840021").number(names::NIGHT_TEMP), Some(16.5));
    }

    #[test]
    fn low_temp_alone_yields_no_temperature() {
        let readings = decode("T1a2b420020");
        assert_eq!(readings.number(names::LOW_TEMP), Some(32.0));
        assert!(!readings.contains(names::TEMPERATURE));
    }

    #[test]
    fn high_temp_combines_with_stored_low_byte() {
        let mut stored = decode("T1a2b420020");
        let readings = decode_with("T1a2b430001", &stored);
        assert_eq!(readings.number(names::HIGH_TEMP), Some(1.0));
        assert_eq!(readings.number(names::TEMPERATURE), Some(28.8));

        stored.merge(readings);
        assert_eq!(stored.number(names::TEMPERATURE), Some(28.8));
    }

    #[test]
    fn high_temp_without_low_byte_uses_zero() {
        let readings = decode("T1a2b430001");
        assert_eq!(readings.number(names::TEMPERATURE), Some(25.6));
    }

    #[test]
    fn diagnostic_functions_pass_through() {
        assert_eq!(decode("T1a2b440003").number(names::WARNINGS), Some(3.0));
        assert_eq!(decode("T1a2b4b0002").number(names::ACKNOWLEDGE), Some(2.0));
        assert_eq!(decode("T1a2b5300ff").number(names::CAN_TRANSMIT), Some(255.0));
        assert_eq!(decode("T1a2b540001").number(names::CAN_RECEIVE), Some(1.0));
        assert_eq!(decode("T1a2b7d0010").number(names::START_TRANSMIT), Some(16.0));
        assert_eq!(decode("T1a2b7e0011").number(names::END_TRANSMIT), Some(17.0));
    }

    #[test]
    fn unknown_function_yields_nothing() {
        assert!(decode("T1a2b600012").is_empty());
        assert!(decode("T1a2b41").is_empty());
        assert!(decode("T1a2b").is_empty());
    }

    #[test]
    fn describe_actuator_messages() {
        let describe = |line: &str| ThermostatDecoder.describe(&ByteFrame::parse(line).unwrap());
        assert_eq!(describe("T1a2b000680"), "Valve at 50.2");
        assert_eq!(describe("T1a2b000080"), "Syncing, valve is at 50.2");
        assert_eq!(describe("T1a2b000100"), "Valve fully open (ON)");
        assert_eq!(describe("T1a2b000200"), "Valve fully closed (OFF)");
        assert_eq!(describe("T1a2b000805"), "Offsetting 5");
        assert_eq!(describe("T1a2b000700"), "Unknown");
        assert_eq!(describe("T1a2b000f00"), "Pairing");
    }

    #[test]
    fn describe_function_messages() {
        let describe = |line: &str| ThermostatDecoder.describe(&ByteFrame::parse(line).unwrap());
        assert_eq!(describe("T1a2b420020"), "Temp Low: 32");
        assert_eq!(describe("T1a2b41002b"), "Desired Temp: 43");
        assert_eq!(
            describe("T1a2b6000ab"),
            "Packet not processed, function is 60 parameter is ab"
        );
        assert_eq!(describe("T1a2b"), "Incomplete packet: T1a2b");
    }
}
