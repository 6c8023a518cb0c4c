// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `SketchLink` - serial LED and JSON coordinate sketches in Rust.
//!
//! This library provides the two classic serial sketches as testable async
//! components, plus the host side that talks to them.
//!
//! # Sketches
//!
//! - **LED sketch**: reads `\n`-terminated lines and drives an output pin
//!   high on `LED ON`, low on `LED OFF`, ignoring anything else
//! - **JSON sketch**: reads `}`-terminated frames, decodes `{"x":..,"y":..}`
//!   into a [`Coordinate`] and prints it back, or prints a diagnostic and
//!   raises an error pin
//!
//! Both run over any tokio stream. The pin is an owned [`OutputPin`], never a
//! global, so sketches can be exercised without hardware.
//!
//! # Quick Start
//!
//! ## Running the JSON sketch on a serial port
//!
//! ```no_run
//! use sketchlink::output::DeviceOutput;
//! use sketchlink::sketch::{JsonSketch, run};
//! use sketchlink::transport::{self, ChannelConfig};
//!
//! #[tokio::main]
//! async fn main() -> sketchlink::Result<()> {
//!     let channel = ChannelConfig::json_primary();
//!     let (input, output) = transport::open("/dev/ttyACM0", &channel)?;
//!
//!     let mut sketch = JsonSketch::setup(input, output, DeviceOutput::new(), &channel);
//!     run(&mut sketch).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Driving a board from the host
//!
//! ```no_run
//! use sketchlink::command::LedCommand;
//! use sketchlink::host::{HostLink, HostLinkConfig, UsbId, discovery};
//! use sketchlink::transport::{self, ChannelConfig};
//!
//! #[tokio::main]
//! async fn main() -> sketchlink::Result<()> {
//!     let channel = ChannelConfig::led();
//!     let board = discovery::find_device(UsbId::new(0x2341, 0x0043), &channel)?;
//!     let (reader, writer) = transport::open(board.port(), &channel)?;
//!
//!     let mut link = HostLink::new(reader, writer, HostLinkConfig::new());
//!     link.send_command(&LedCommand::On).await?;
//!     Ok(())
//! }
//! ```
//!
//! [`Coordinate`]: types::Coordinate
//! [`OutputPin`]: output::OutputPin

pub mod command;
pub mod decoder;
pub mod error;
pub mod host;
pub mod output;
pub mod sketch;
pub mod subscription;
pub mod transport;
pub mod types;

pub use command::{Command, Interpretation, LedCommand, interpret};
pub use decoder::CoordinateDecoder;
pub use error::{DecodeError, DeviceError, Error, Result, TransportError, ValueError};
pub use host::{HostLink, HostLinkConfig, SerialDevice, UsbId};
pub use output::{DeviceOutput, OutputPin};
pub use sketch::{JsonSketch, LedSketch, Sketch, StepOutcome};
pub use subscription::{CallbackRegistry, LevelChange, SubscriptionId};
pub use transport::{ChannelConfig, FrameConfig, FrameReader, ReadOutcome};
pub use types::{Coordinate, PinLevel, PinReading, PinValue};
