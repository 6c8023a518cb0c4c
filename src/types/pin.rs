// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pin-related types.
//!
//! This module provides the digital output level of a GPIO pin and the pin
//! reports a sketch can send back to the host (`"<pin> <value>"` lines).

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Level of a digital pin.
///
/// # Examples
///
/// ```
/// use sketchlink::types::PinLevel;
///
/// assert_eq!(PinLevel::High.as_str(), "HIGH");
/// assert_eq!("LOW".parse::<PinLevel>().unwrap(), PinLevel::Low);
/// assert!("low".parse::<PinLevel>().is_err());
/// assert_eq!(PinLevel::from(true), PinLevel::High);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub enum PinLevel {
    /// Pin is driven low (LED off).
    #[default]
    Low,
    /// Pin is driven high (LED on).
    High,
}

impl PinLevel {
    /// Returns the textual representation used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::High => "HIGH",
        }
    }

    /// Returns `true` if the pin is high.
    #[must_use]
    pub const fn is_high(&self) -> bool {
        matches!(self, Self::High)
    }
}

impl fmt::Display for PinLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parses the wire form printed by the board, `HIGH` or `LOW`.
impl FromStr for PinLevel {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "HIGH" => Ok(Self::High),
            _ => Err(ValueError::InvalidPinLevel(s.to_string())),
        }
    }
}

impl From<bool> for PinLevel {
    fn from(value: bool) -> Self {
        if value { Self::High } else { Self::Low }
    }
}

/// Value carried by a pin report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinValue {
    /// Analog reading from the 10-bit converter.
    Analog(u16),
    /// Digital level.
    Digital(PinLevel),
}

/// A single pin report sent by a sketch, such as `"16 512"` or `"7 HIGH"`.
///
/// # Examples
///
/// ```
/// use sketchlink::types::{PinLevel, PinReading, PinValue};
///
/// let analog = PinReading::parse("16 512", ' ').unwrap();
/// assert_eq!(analog.pin, 16);
/// assert_eq!(analog.value, PinValue::Analog(512));
///
/// let digital = PinReading::parse("7 HIGH", ' ').unwrap();
/// assert_eq!(digital.value, PinValue::Digital(PinLevel::High));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinReading {
    /// The pin number.
    pub pin: u8,
    /// The reported value.
    pub value: PinValue,
}

impl PinReading {
    /// Highest value produced by the analog converter.
    pub const ANALOG_MAX: u16 = 1023;

    /// Parses a pin report whose two fields are separated by `separator`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidPinReading` if the line does not have
    /// exactly two fields or the pin is not a number, and
    /// `ValueError::OutOfRange` if an analog value exceeds [`Self::ANALOG_MAX`].
    pub fn parse(line: &str, separator: char) -> Result<Self, ValueError> {
        let invalid = || ValueError::InvalidPinReading(line.to_string());

        let mut fields = line.trim().split(separator).filter(|f| !f.is_empty());
        let (Some(pin), Some(value), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(invalid());
        };

        let pin: u8 = pin.parse().map_err(|_| invalid())?;

        let value = if let Ok(raw) = value.parse::<u16>() {
            if raw > Self::ANALOG_MAX {
                return Err(ValueError::OutOfRange {
                    min: 0,
                    max: Self::ANALOG_MAX,
                    actual: raw,
                });
            }
            PinValue::Analog(raw)
        } else {
            PinValue::Digital(value.parse().map_err(|_| invalid())?)
        };

        Ok(Self { pin, value })
    }
}

impl fmt::Display for PinReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            PinValue::Analog(raw) => write!(f, "{} {raw}", self.pin),
            PinValue::Digital(level) => write!(f, "{} {level}", self.pin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_level_parses_wire_form_only() {
        assert_eq!("HIGH".parse::<PinLevel>().unwrap(), PinLevel::High);
        assert_eq!("LOW".parse::<PinLevel>().unwrap(), PinLevel::Low);
        for text in ["high", "on", "0", "maybe"] {
            assert!(
                matches!(text.parse::<PinLevel>(), Err(ValueError::InvalidPinLevel(_))),
                "{text:?}"
            );
        }
    }

    #[test]
    fn pin_reading_digital_uses_wire_form() {
        assert_eq!(
            PinReading::parse("7 HIGH", ' ').unwrap().value,
            PinValue::Digital(PinLevel::High)
        );
        assert!(PinReading::parse("7 high", ' ').is_err());
        assert!(PinReading::parse("7 ON", ' ').is_err());
    }

    #[test]
    fn pin_level_default_is_low() {
        assert_eq!(PinLevel::default(), PinLevel::Low);
        assert!(!PinLevel::default().is_high());
    }

    #[test]
    fn pin_reading_analog() {
        let reading = PinReading::parse("19 1023", ' ').unwrap();
        assert_eq!(reading.pin, 19);
        assert_eq!(reading.value, PinValue::Analog(1023));
        assert_eq!(reading.to_string(), "19 1023");
    }

    #[test]
    fn pin_reading_custom_separator() {
        let reading = PinReading::parse("16,0", ',').unwrap();
        assert_eq!(reading.value, PinValue::Analog(0));
    }

    #[test]
    fn pin_reading_tolerates_line_ending() {
        let reading = PinReading::parse("7 LOW\r", ' ').unwrap();
        assert_eq!(reading.value, PinValue::Digital(PinLevel::Low));
    }

    #[test]
    fn pin_reading_rejects_out_of_range() {
        assert_eq!(
            PinReading::parse("16 2000", ' '),
            Err(ValueError::OutOfRange {
                min: 0,
                max: 1023,
                actual: 2000
            })
        );
    }

    #[test]
    fn pin_reading_rejects_malformed() {
        for line in ["", "16", "16 512 3", "x 512", "16 maybe", "300 1"] {
            assert!(PinReading::parse(line, ' ').is_err(), "{line:?}");
        }
    }
}
