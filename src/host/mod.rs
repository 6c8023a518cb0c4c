// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The host end of a sketch connection.
//!
//! - [`SerialDevice`] and [`UsbId`] describe attached boards
//! - [`discovery`] finds them (feature `serial`)
//! - [`HostLink`] sends commands and coordinates and reads reply lines

mod device;
#[cfg(feature = "serial")]
pub mod discovery;
mod link;

pub use device::{SerialDevice, UsbId};
pub use link::{HostLink, HostLinkConfig};
