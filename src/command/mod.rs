// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line commands understood by the LED sketch.
//!
//! A command is one line of ASCII text terminated by `\n`. The only
//! recognized commands are `LED ON` and `LED OFF`; everything else is an
//! unrecognized command and is ignored.
//!
//! # Examples
//!
//! ```
//! use sketchlink::command::{Interpretation, LedCommand, interpret};
//! use sketchlink::output::{DeviceOutput, OutputPin};
//!
//! let mut led = DeviceOutput::new();
//!
//! assert_eq!(
//!     interpret("LED ON", &mut led),
//!     Interpretation::Applied { command: LedCommand::On, changed: true }
//! );
//! assert!(led.is_high());
//!
//! // Unknown input leaves the pin alone
//! assert_eq!(interpret("hello", &mut led), Interpretation::Ignored);
//! assert!(led.is_high());
//! ```

mod led;

pub use led::LedCommand;

use crate::output::OutputPin;

/// A command that can be written to a sketch as a text line.
pub trait Command {
    /// Returns the command text without a line terminator.
    fn text(&self) -> String;

    /// Returns the command text followed by the `\n` terminator.
    fn wire_line(&self) -> String {
        format!("{}\n", self.text())
    }
}

/// Result of interpreting one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    /// The line was a recognized command and was applied to the output.
    Applied {
        /// The command that was applied.
        command: LedCommand,
        /// Whether the output level changed.
        changed: bool,
    },
    /// The line was not a recognized command. The output is unchanged.
    Ignored,
}

/// Interprets one line against the output pin.
///
/// `"LED ON"` drives the pin high, `"LED OFF"` drives it low. Any other line
/// is silently ignored.
pub fn interpret<P: OutputPin>(line: &str, output: &mut P) -> Interpretation {
    match line.parse::<LedCommand>() {
        Ok(command) => {
            let changed = output.write(command.level());
            tracing::debug!(command = %command, changed, "Applied LED command");
            Interpretation::Applied { command, changed }
        }
        Err(e) => {
            tracing::trace!(error = %e, "Ignoring line");
            Interpretation::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::DeviceOutput;
    use crate::types::PinLevel;

    #[test]
    fn on_then_off() {
        let mut led = DeviceOutput::new();
        interpret("LED ON", &mut led);
        assert_eq!(led.level(), PinLevel::High);
        interpret("LED OFF", &mut led);
        assert_eq!(led.level(), PinLevel::Low);
    }

    #[test]
    fn repeated_on_is_idempotent() {
        let mut led = DeviceOutput::new();
        let first = interpret("LED ON", &mut led);
        assert_eq!(
            first,
            Interpretation::Applied {
                command: LedCommand::On,
                changed: true
            }
        );

        for _ in 0..5 {
            let again = interpret("LED ON", &mut led);
            assert_eq!(
                again,
                Interpretation::Applied {
                    command: LedCommand::On,
                    changed: false
                }
            );
        }
        assert!(led.is_high());
    }

    #[test]
    fn unknown_input_preserves_both_levels() {
        for initial in [PinLevel::Low, PinLevel::High] {
            let mut led = DeviceOutput::with_level(initial);
            for line in ["hello", "", "LED on", "LED OFF\r", "LED ON\n"] {
                assert_eq!(interpret(line, &mut led), Interpretation::Ignored);
                assert_eq!(led.level(), initial);
            }
        }
    }
}
