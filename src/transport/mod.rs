// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serial transport.
//!
//! Everything above this module works on plain tokio [`AsyncRead`] and
//! [`AsyncWrite`] streams. A real port is opened through the `serial`
//! feature; tests use `tokio::io::duplex` as the wire.
//!
//! [`AsyncRead`]: tokio::io::AsyncRead
//! [`AsyncWrite`]: tokio::io::AsyncWrite

mod frame;
#[cfg(feature = "serial")]
mod serial;

use std::time::Duration;

pub use frame::{FrameConfig, FrameReader, ReadOutcome};
pub(crate) use frame::millis;
#[cfg(feature = "serial")]
pub use serial::{SerialReader, SerialWriter, open};

use crate::error::ValueError;

/// Settings of one serial channel.
///
/// Framing is always 8 data bits, no parity, one stop bit and no flow
/// control; only the bit rate and read timeout vary.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use sketchlink::transport::ChannelConfig;
///
/// let led = ChannelConfig::led();
/// assert_eq!(led.baud_rate(), 9600);
/// assert_eq!(led.read_timeout(), Duration::from_millis(1000));
///
/// let custom = ChannelConfig::new(57_600)
///     .unwrap()
///     .with_read_timeout(Duration::from_millis(50));
/// assert_eq!(custom.baud_rate(), 57_600);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    baud_rate: u32,
    read_timeout: Duration,
}

impl ChannelConfig {
    /// Bit rate of the LED command channel and the secondary JSON channel.
    pub const SLOW_BAUD_RATE: u32 = 9600;
    /// Bit rate of the primary JSON channel.
    pub const FAST_BAUD_RATE: u32 = 115_200;
    /// Default read timeout, matching the usual stream timeout of a sketch.
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(1000);
    /// Read timeout of the primary JSON channel.
    pub const JSON_READ_TIMEOUT: Duration = Duration::from_millis(10);
    /// Data bits per character.
    pub const DATA_BITS: u8 = 8;

    /// Creates a channel configuration with the default read timeout.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidConfiguration` if `baud_rate` is zero.
    pub fn new(baud_rate: u32) -> Result<Self, ValueError> {
        if baud_rate == 0 {
            return Err(ValueError::InvalidConfiguration(
                "baud rate must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            baud_rate,
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
        })
    }

    /// Channel used by the LED sketch: 9600 baud, 1 s read timeout.
    #[must_use]
    pub const fn led() -> Self {
        Self {
            baud_rate: Self::SLOW_BAUD_RATE,
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
        }
    }

    /// Primary channel of the JSON sketch: 115200 baud, 10 ms read timeout.
    #[must_use]
    pub const fn json_primary() -> Self {
        Self {
            baud_rate: Self::FAST_BAUD_RATE,
            read_timeout: Self::JSON_READ_TIMEOUT,
        }
    }

    /// Secondary channel of the JSON sketch: 9600 baud.
    #[must_use]
    pub const fn json_secondary() -> Self {
        Self {
            baud_rate: Self::SLOW_BAUD_RATE,
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
        }
    }

    /// Sets the read timeout.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Returns the bit rate.
    #[must_use]
    pub const fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Returns the read timeout.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::led()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        assert_eq!(ChannelConfig::json_primary().baud_rate(), 115_200);
        assert_eq!(
            ChannelConfig::json_primary().read_timeout(),
            Duration::from_millis(10)
        );
        assert_eq!(ChannelConfig::json_secondary().baud_rate(), 9600);
        assert_eq!(ChannelConfig::default(), ChannelConfig::led());
    }

    #[test]
    fn zero_baud_rate_is_rejected() {
        assert!(matches!(
            ChannelConfig::new(0),
            Err(ValueError::InvalidConfiguration(_))
        ));
    }
}
