// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Built-in LED commands.

use std::fmt;
use std::str::FromStr;

use crate::command::Command;
use crate::error::ValueError;
use crate::types::PinLevel;

/// Command that switches the built-in LED.
///
/// Parsing is an exact, case-sensitive match on the whole line.
///
/// # Examples
///
/// ```
/// use sketchlink::command::{Command, LedCommand};
/// use sketchlink::types::PinLevel;
///
/// let cmd: LedCommand = "LED ON".parse().unwrap();
/// assert_eq!(cmd, LedCommand::On);
/// assert_eq!(cmd.level(), PinLevel::High);
/// assert_eq!(cmd.wire_line(), "LED ON\n");
///
/// assert!("led on".parse::<LedCommand>().is_err());
/// assert!("LED ON ".parse::<LedCommand>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedCommand {
    /// Drive the LED high.
    On,
    /// Drive the LED low.
    Off,
}

impl LedCommand {
    /// Text of the `On` command.
    pub const ON: &'static str = "LED ON";
    /// Text of the `Off` command.
    pub const OFF: &'static str = "LED OFF";

    /// Returns the pin level this command drives.
    #[must_use]
    pub const fn level(&self) -> PinLevel {
        match self {
            Self::On => PinLevel::High,
            Self::Off => PinLevel::Low,
        }
    }
}

impl Command for LedCommand {
    fn text(&self) -> String {
        match self {
            Self::On => Self::ON.to_string(),
            Self::Off => Self::OFF.to_string(),
        }
    }
}

impl FromStr for LedCommand {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::ON => Ok(Self::On),
            Self::OFF => Ok(Self::Off),
            _ => Err(ValueError::UnrecognizedCommand(s.to_string())),
        }
    }
}

impl From<PinLevel> for LedCommand {
    fn from(level: PinLevel) -> Self {
        match level {
            PinLevel::High => Self::On,
            PinLevel::Low => Self::Off,
        }
    }
}

impl fmt::Display for LedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_lines() {
        assert_eq!("LED ON".parse::<LedCommand>().unwrap(), LedCommand::On);
        assert_eq!("LED OFF".parse::<LedCommand>().unwrap(), LedCommand::Off);
    }

    #[test]
    fn rejects_near_misses() {
        for line in ["", "LED", "LED ON\r", " LED OFF", "Led On", "LED  ON", "hello"] {
            assert!(
                matches!(
                    line.parse::<LedCommand>(),
                    Err(ValueError::UnrecognizedCommand(_))
                ),
                "{line:?} should not parse"
            );
        }
    }

    #[test]
    fn level_mapping() {
        assert_eq!(LedCommand::On.level(), PinLevel::High);
        assert_eq!(LedCommand::Off.level(), PinLevel::Low);
        assert_eq!(LedCommand::from(PinLevel::High), LedCommand::On);
    }

    #[test]
    fn wire_line_has_newline() {
        assert_eq!(LedCommand::Off.wire_line(), "LED OFF\n");
        assert_eq!(LedCommand::Off.to_string(), "LED OFF");
    }
}
