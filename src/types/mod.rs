// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the sketches and the host link.
//!
//! # Types
//!
//! - [`PinLevel`] - High/Low level of a digital output
//! - [`PinReading`] - A `"<pin> <value>"` report from a sketch
//! - [`Coordinate`] - Decoded X/Y position
//! - [`map_range`] - Linear range conversion

mod coordinate;
mod pin;

pub use coordinate::{Coordinate, map_range};
pub use pin::{PinLevel, PinReading, PinValue};
