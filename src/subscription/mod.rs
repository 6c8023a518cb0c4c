// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for output pin changes.
//!
//! A [`DeviceOutput`](crate::output::DeviceOutput) owns a [`CallbackRegistry`]
//! and dispatches a [`LevelChange`] every time a write flips the pin.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! use sketchlink::output::{DeviceOutput, OutputPin};
//! use sketchlink::types::PinLevel;
//!
//! let lit = Arc::new(AtomicBool::new(false));
//! let mut led = DeviceOutput::new();
//!
//! let flag = Arc::clone(&lit);
//! let sub_id = led.on_level_changed(move |change| {
//!     flag.store(change.current.is_high(), Ordering::SeqCst);
//! });
//!
//! led.write(PinLevel::High);
//! assert!(lit.load(Ordering::SeqCst));
//!
//! led.unsubscribe(sub_id);
//! ```

mod callback;

pub use callback::{CallbackRegistry, LevelChange, SubscriptionId};
