// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `SketchLink` library.
//!
//! This module provides the error hierarchy for the library: value
//! validation, serial transport, JSON frame decoding, and device discovery.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred on the serial transport.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error occurred while decoding a frame.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error occurred while locating or opening a device.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// An invalid pin level string was provided.
    #[error("invalid pin level: {0}")]
    InvalidPinLevel(String),

    /// A line did not match any known command.
    #[error("unrecognized command: {0:?}")]
    UnrecognizedCommand(String),

    /// A pin report line could not be parsed.
    #[error("invalid pin reading: {0:?}")]
    InvalidPinReading(String),

    /// A range conversion was requested with an empty source range.
    #[error("source range is empty")]
    EmptyRange,

    /// A coordinate component is NaN or infinite and cannot be sent.
    #[error("coordinate component {0} is not finite")]
    NonFiniteCoordinate(&'static str),

    /// A configuration value is not usable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Errors related to the serial transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Reading from or writing to the stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The serial port could not be opened or configured.
    #[cfg(feature = "serial")]
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Waiting for input timed out.
    #[error("read timed out after {0} ms")]
    Timeout(u64),

    /// The stream reached end of input.
    #[error("stream closed")]
    Closed,

    /// Internal channel was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

/// Errors raised while decoding a coordinate frame.
///
/// Each variant maps to a short diagnostic code, see [`DecodeError::code`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The frame contained no JSON at all.
    #[error("empty input")]
    EmptyInput,

    /// The frame ended before the JSON document was complete.
    #[error("incomplete input")]
    IncompleteInput,

    /// The frame is not valid JSON or not a JSON object.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The frame is larger than the decoder capacity.
    #[error("frame of {actual} bytes exceeds capacity of {capacity} bytes")]
    NoMemory {
        /// Configured capacity in bytes.
        capacity: usize,
        /// Size of the rejected frame.
        actual: usize,
    },

    /// A required key is absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A required key holds a value that is not a finite number.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// The key that failed to convert.
        field: &'static str,
        /// Description of the conversion failure.
        message: String,
    },
}

impl DecodeError {
    /// Returns the short diagnostic code written after a failed decode.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchlink::error::DecodeError;
    ///
    /// assert_eq!(DecodeError::IncompleteInput.code(), "IncompleteInput");
    /// assert_eq!(DecodeError::MissingField("y").code(), "MissingField(y)");
    /// ```
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::EmptyInput => "EmptyInput".to_string(),
            Self::IncompleteInput => "IncompleteInput".to_string(),
            Self::InvalidInput(_) => "InvalidInput".to_string(),
            Self::NoMemory { .. } => "NoMemory".to_string(),
            Self::MissingField(field) => format!("MissingField({field})"),
            Self::InvalidValue { field, .. } => format!("InvalidValue({field})"),
        }
    }
}

/// Errors related to serial device discovery.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// No device with the requested USB ids is attached.
    #[error("no device found for {0}")]
    NotFound(String),

    /// A hardware id string could not be parsed.
    #[error("invalid hardware id: {0}")]
    InvalidHardwareId(String),

    /// The port name is empty or otherwise unusable.
    #[error("invalid port name: {0:?}")]
    InvalidPort(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
