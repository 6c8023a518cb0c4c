// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The two sketches and their loop driver.
//!
//! A sketch is built once (`setup`) and then stepped forever (`loop`). Each
//! [`Sketch::step`] waits until input is readable, reads one frame under a
//! bounded timeout and reacts to it at most once.
//!
//! - [`LedSketch`] - switches an output pin from `LED ON` / `LED OFF` lines
//! - [`JsonSketch`] - decodes `{"x":..,"y":..}` frames and reports them
//!
//! # Examples
//!
//! ```
//! use sketchlink::output::{DeviceOutput, OutputPin};
//! use sketchlink::sketch::{LedSketch, run};
//! use sketchlink::transport::ChannelConfig;
//! use tokio::io::AsyncWriteExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (mut host, device) = tokio::io::duplex(64);
//! host.write_all(b"LED ON\n").await?;
//! drop(host);
//!
//! let mut sketch = LedSketch::setup(device, DeviceOutput::new(), &ChannelConfig::led());
//! let steps = run(&mut sketch).await?;
//!
//! assert_eq!(steps, 1);
//! assert!(sketch.output().is_high());
//! # Ok(())
//! # }
//! ```

mod json;
mod led;

use std::future::Future;

pub use json::JsonSketch;
pub use led::LedSketch;

use crate::command::Interpretation;
use crate::error::{DecodeError, TransportError};
use crate::types::Coordinate;

/// What one iteration of a sketch did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A line was interpreted as a command (or ignored).
    Command(Interpretation),
    /// A coordinate was decoded and its report written.
    Reported(Coordinate),
    /// A frame failed to decode; the diagnostic was written and the error
    /// pin raised.
    DecodeFailed(DecodeError),
    /// A line was cut off by the read timeout or end of input and dropped.
    Incomplete {
        /// The bytes received before the line was cut off.
        partial: String,
    },
    /// A line longer than the frame limit was discarded.
    Oversized {
        /// Number of bytes discarded.
        length: usize,
    },
    /// No input arrived within the idle timeout.
    Idle,
    /// The input stream ended.
    Closed,
}

/// A single-loop program driven one iteration at a time.
#[allow(async_fn_in_trait)]
pub trait Sketch {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Runs one read-and-react iteration.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if reading from or writing to the streams
    /// fails. Bad input is never an error; it is reported as an outcome.
    async fn step(&mut self) -> Result<StepOutcome, TransportError>;
}

/// Steps `sketch` until its input closes.
///
/// Returns the number of iterations that processed input (idle and closed
/// iterations are not counted).
///
/// # Errors
///
/// Returns the first `TransportError` raised by [`Sketch::step`].
pub async fn run<S: Sketch>(sketch: &mut S) -> Result<u64, TransportError> {
    run_until(sketch, std::future::pending()).await
}

/// Steps `sketch` until its input closes or `shutdown` resolves.
///
/// An iteration in progress when `shutdown` resolves is abandoned.
///
/// # Errors
///
/// Returns the first `TransportError` raised by [`Sketch::step`].
pub async fn run_until<S, F>(sketch: &mut S, shutdown: F) -> Result<u64, TransportError>
where
    S: Sketch,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let name = sketch.name();
    let mut steps = 0u64;

    tracing::info!(sketch = name, "Sketch loop started");
    loop {
        let outcome = tokio::select! {
            biased;
            () = &mut shutdown => {
                tracing::info!(sketch = name, steps, "Sketch loop stopped by shutdown");
                return Ok(steps);
            }
            outcome = sketch.step() => outcome?,
        };

        match outcome {
            StepOutcome::Closed => {
                tracing::info!(sketch = name, steps, "Input closed, sketch loop finished");
                return Ok(steps);
            }
            StepOutcome::Idle => {}
            _ => steps += 1,
        }
    }
}
