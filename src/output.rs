// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Digital output pins.
//!
//! The sketches never touch a global pin. They are handed an owned
//! [`OutputPin`] and drive it through that handle, so any backend (a real
//! GPIO line, a test double, the in-memory [`DeviceOutput`]) can be plugged in.

use crate::subscription::{CallbackRegistry, LevelChange, SubscriptionId};
use crate::types::PinLevel;

/// A single digital output line.
pub trait OutputPin {
    /// Drives the pin to `level`.
    ///
    /// Returns `true` if the level actually changed.
    fn write(&mut self, level: PinLevel) -> bool;

    /// Returns the level the pin is currently driven to.
    fn level(&self) -> PinLevel;

    /// Returns `true` if the pin is driven high.
    fn is_high(&self) -> bool {
        self.level().is_high()
    }
}

/// In-memory output pin holding the device output state.
///
/// Starts [`PinLevel::Low`] (the state after pin mode setup) and holds its
/// level until the next write. Level changes are dispatched to subscribers.
///
/// # Examples
///
/// ```
/// use sketchlink::output::{DeviceOutput, OutputPin};
/// use sketchlink::types::PinLevel;
///
/// let mut led = DeviceOutput::new();
/// assert!(led.write(PinLevel::High));
/// // Writing the same level again is not a change
/// assert!(!led.write(PinLevel::High));
/// assert!(led.is_high());
/// ```
#[derive(Debug, Default)]
pub struct DeviceOutput {
    level: PinLevel,
    callbacks: CallbackRegistry,
}

impl DeviceOutput {
    /// Creates a pin driven low.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pin already driven to `level`.
    #[must_use]
    pub fn with_level(level: PinLevel) -> Self {
        Self {
            level,
            callbacks: CallbackRegistry::new(),
        }
    }

    /// Registers a callback for level changes.
    pub fn on_level_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(LevelChange) + Send + Sync + 'static,
    {
        self.callbacks.on_level_changed(callback)
    }

    /// Removes a previously registered callback.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }
}

impl OutputPin for DeviceOutput {
    fn write(&mut self, level: PinLevel) -> bool {
        let previous = self.level;
        if previous == level {
            return false;
        }
        self.level = level;
        tracing::debug!(from = %previous, to = %level, "Output pin changed");
        self.callbacks.dispatch(LevelChange {
            previous,
            current: level,
        });
        true
    }

    fn level(&self) -> PinLevel {
        self.level
    }
}

impl<P: OutputPin + ?Sized> OutputPin for &mut P {
    fn write(&mut self, level: PinLevel) -> bool {
        (**self).write(level)
    }

    fn level(&self) -> PinLevel {
        (**self).level()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn starts_low() {
        let led = DeviceOutput::new();
        assert_eq!(led.level(), PinLevel::Low);
        assert!(!led.is_high());
    }

    #[test]
    fn with_level_sets_initial_state() {
        let led = DeviceOutput::with_level(PinLevel::High);
        assert!(led.is_high());
    }

    #[test]
    fn only_real_changes_are_dispatched() {
        let mut led = DeviceOutput::new();
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&changes);
        led.on_level_changed(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        led.write(PinLevel::Low);
        led.write(PinLevel::High);
        led.write(PinLevel::High);
        led.write(PinLevel::Low);

        assert_eq!(changes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn mutable_reference_is_a_pin() {
        fn drive(mut pin: impl OutputPin) {
            pin.write(PinLevel::High);
        }

        let mut led = DeviceOutput::new();
        drive(&mut led);
        assert!(led.is_high());
    }
}
