// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Two-axis coordinate and range mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// A decoded X/Y position.
///
/// Serializes to the compact wire form `{"x":1.5,"y":2.0}`.
///
/// # Examples
///
/// ```
/// use sketchlink::types::Coordinate;
///
/// let pos = Coordinate::new(1.5, -2.25);
/// assert_eq!(pos.to_string(), "X Position = 1.50   Y Position = -2.25");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Formats the report line printed after a successful decode.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X Position = {:.2}   Y Position = {:.2}", self.x, self.y)
    }
}

/// Re-maps `value` from one range to another, like the Arduino `map` helper.
///
/// The result is not clamped, so values outside the source range map to
/// values outside the target range. Reversed ranges are allowed.
///
/// # Errors
///
/// Returns `ValueError::EmptyRange` if `from_low == from_high`.
///
/// # Examples
///
/// ```
/// use sketchlink::types::map_range;
///
/// // Analog reading to -10..10
/// assert_eq!(map_range(1023.0, 0.0, 1023.0, -10.0, 10.0).unwrap(), 10.0);
/// // Pointer position to -200..200
/// assert_eq!(map_range(960.0, 0.0, 1920.0, -200.0, 200.0).unwrap(), 0.0);
/// ```
#[allow(clippy::float_cmp)]
pub fn map_range(
    value: f32,
    from_low: f32,
    from_high: f32,
    to_low: f32,
    to_high: f32,
) -> Result<f32, ValueError> {
    if from_low == from_high {
        return Err(ValueError::EmptyRange);
    }
    Ok((value - from_low) * (to_high - to_low) / (from_high - from_low) + to_low)
}
