// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of `{"x":..,"y":..}` frames into [`Coordinate`]s.
//!
//! Both keys are required. Values may be JSON numbers or strings holding a
//! number (`"1.5"`); anything else is rejected. Unknown keys are ignored.
//!
//! # Examples
//!
//! ```
//! use sketchlink::decoder::CoordinateDecoder;
//! use sketchlink::error::DecodeError;
//! use sketchlink::types::Coordinate;
//!
//! let decoder = CoordinateDecoder::default();
//!
//! let pos = decoder.decode(r#"{"x":1.5,"y":-2.25}"#).unwrap();
//! assert_eq!(pos, Coordinate::new(1.5, -2.25));
//!
//! assert_eq!(
//!     decoder.decode(r#"{"x":1.5}"#),
//!     Err(DecodeError::MissingField("y"))
//! );
//! ```

use serde_json::{Map, Value};
use serde_json::error::Category;

use crate::error::{DecodeError, ValueError};
use crate::types::Coordinate;

/// Prefix of the diagnostic line written after a failed decode.
pub const DIAGNOSTIC_PREFIX: &str = "deserializeJson() failed: ";

/// Decodes coordinate frames with a bounded input size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateDecoder {
    capacity: usize,
}

impl CoordinateDecoder {
    /// Default frame capacity in bytes.
    pub const DEFAULT_CAPACITY: usize = 200;

    /// Creates a decoder accepting frames of at most `capacity` bytes.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidConfiguration` if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, ValueError> {
        if capacity == 0 {
            return Err(ValueError::InvalidConfiguration(
                "decoder capacity must be greater than zero".to_string(),
            ));
        }
        Ok(Self { capacity })
    }

    /// Returns the frame capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Decodes one frame.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] describing why the frame is not a coordinate.
    pub fn decode(&self, frame: &str) -> Result<Coordinate, DecodeError> {
        if frame.len() > self.capacity {
            return Err(DecodeError::NoMemory {
                capacity: self.capacity,
                actual: frame.len(),
            });
        }
        if frame.trim().is_empty() {
            return Err(DecodeError::EmptyInput);
        }

        let value: Value = serde_json::from_str(frame).map_err(|e| match e.classify() {
            Category::Eof => DecodeError::IncompleteInput,
            Category::Io | Category::Syntax | Category::Data => {
                DecodeError::InvalidInput(e.to_string())
            }
        })?;

        let Value::Object(object) = value else {
            return Err(DecodeError::InvalidInput(
                "expected a JSON object".to_string(),
            ));
        };

        Ok(Coordinate {
            x: number_field(&object, "x")?,
            y: number_field(&object, "y")?,
        })
    }
}

impl Default for CoordinateDecoder {
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn number_field(object: &Map<String, Value>, field: &'static str) -> Result<f32, DecodeError> {
    let invalid = |message: String| DecodeError::InvalidValue { field, message };

    let number = match object.get(field) {
        None => return Err(DecodeError::MissingField(field)),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| invalid(format!("{n} is not representable")))?
            as f32,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f32>()
            .map_err(|e| invalid(format!("{s:?}: {e}")))?,
        Some(other) => return Err(invalid(format!("expected a number, got {other}"))),
    };

    if number.is_finite() {
        Ok(number)
    } else {
        Err(invalid(format!("{number} is not finite")))
    }
}

/// Formats the diagnostic line for a failed decode, without line terminator.
///
/// ```
/// use sketchlink::decoder::diagnostic;
/// use sketchlink::error::DecodeError;
///
/// assert_eq!(
///     diagnostic(&DecodeError::InvalidInput("oops".into())),
///     "deserializeJson() failed: InvalidInput"
/// );
/// ```
#[must_use]
pub fn diagnostic(error: &DecodeError) -> String {
    format!("{DIAGNOSTIC_PREFIX}{}", error.code())
}
