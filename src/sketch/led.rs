// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! LED command sketch.

use tokio::io::AsyncRead;

use super::{Sketch, StepOutcome};
use crate::command::interpret;
use crate::error::TransportError;
use crate::output::OutputPin;
use crate::transport::{ChannelConfig, FrameConfig, FrameReader, ReadOutcome};

/// Reads `\n`-terminated lines and switches an output pin.
///
/// Lines cut off by the read timeout or end of input are dropped without
/// touching the pin, so only complete `LED ON` / `LED OFF` lines act.
#[derive(Debug)]
pub struct LedSketch<R, P> {
    reader: FrameReader<R>,
    output: P,
}

impl<R, P> LedSketch<R, P>
where
    R: AsyncRead + Unpin,
    P: OutputPin,
{
    /// Builds the sketch over `input`, driving `output`.
    pub fn setup(input: R, output: P, channel: &ChannelConfig) -> Self {
        tracing::info!(
            baud = channel.baud_rate(),
            read_timeout_ms = crate::transport::millis(channel.read_timeout()),
            "LED sketch ready"
        );
        let frames = FrameConfig::new(b'\n').with_read_timeout(channel.read_timeout());
        Self::with_frame_config(input, output, frames)
    }

    /// Builds the sketch with explicit framing.
    pub fn with_frame_config(input: R, output: P, frames: FrameConfig) -> Self {
        Self {
            reader: FrameReader::new(input, frames),
            output,
        }
    }

    /// Returns the output pin.
    pub fn output(&self) -> &P {
        &self.output
    }

    /// Returns the output pin mutably.
    pub fn output_mut(&mut self) -> &mut P {
        &mut self.output
    }

    /// Consumes the sketch and returns the input stream and output pin.
    pub fn into_parts(self) -> (R, P) {
        (self.reader.into_inner(), self.output)
    }
}

impl<R, P> Sketch for LedSketch<R, P>
where
    R: AsyncRead + Unpin,
    P: OutputPin,
{
    fn name(&self) -> &'static str {
        "led"
    }

    async fn step(&mut self) -> Result<StepOutcome, TransportError> {
        match self.reader.wait_readable().await {
            Ok(()) => {}
            Err(TransportError::Closed) => return Ok(StepOutcome::Closed),
            Err(TransportError::Timeout(_)) => return Ok(StepOutcome::Idle),
            Err(e) => return Err(e),
        }

        let outcome = match self.reader.read_frame().await? {
            ReadOutcome::Frame(line) => StepOutcome::Command(interpret(&line, &mut self.output)),
            ReadOutcome::Timeout { partial } | ReadOutcome::Closed { partial } => {
                tracing::debug!(partial = %partial, "Dropping unterminated line");
                StepOutcome::Incomplete { partial }
            }
            ReadOutcome::Overflow { length, .. } => StepOutcome::Oversized { length },
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::AsyncWriteExt;

    use super::*;
    use crate::command::{Interpretation, LedCommand};
    use crate::output::DeviceOutput;
    use crate::types::PinLevel;

    #[tokio::test]
    async fn applies_commands_in_order() {
        let (mut host, device) = tokio::io::duplex(64);
        host.write_all(b"LED ON\nhello\nLED OFF\n").await.unwrap();

        let mut sketch = LedSketch::setup(device, DeviceOutput::new(), &ChannelConfig::led());

        let first = sketch.step().await.unwrap();
        assert_eq!(
            first,
            StepOutcome::Command(Interpretation::Applied {
                command: LedCommand::On,
                changed: true
            })
        );
        assert_eq!(sketch.output().level(), PinLevel::High);

        let second = sketch.step().await.unwrap();
        assert_eq!(second, StepOutcome::Command(Interpretation::Ignored));
        assert_eq!(sketch.output().level(), PinLevel::High);

        sketch.step().await.unwrap();
        assert_eq!(sketch.output().level(), PinLevel::Low);
    }

    #[tokio::test(start_paused = true)]
    async fn unterminated_command_is_not_applied() {
        let (mut host, device) = tokio::io::duplex(64);
        host.write_all(b"LED ON").await.unwrap();

        let mut sketch = LedSketch::setup(device, DeviceOutput::new(), &ChannelConfig::led());
        assert_eq!(
            sketch.step().await.unwrap(),
            StepOutcome::Incomplete {
                partial: "LED ON".to_string()
            }
        );
        assert!(!sketch.output().is_high());
        drop(host);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_timeout_yields_idle() {
        let (host, device) = tokio::io::duplex(64);
        let frames = FrameConfig::new(b'\n').with_idle_timeout(Some(Duration::from_secs(1)));

        let mut sketch = LedSketch::with_frame_config(device, DeviceOutput::new(), frames);
        assert_eq!(sketch.step().await.unwrap(), StepOutcome::Idle);
        drop(host);
    }

    #[tokio::test]
    async fn oversized_line_is_dropped() {
        let (mut host, device) = tokio::io::duplex(64);
        host.write_all(b"LED ON LED ON LED ON\n").await.unwrap();

        let frames = FrameConfig::new(b'\n').with_max_len(8);
        let mut sketch = LedSketch::with_frame_config(device, DeviceOutput::new(), frames);
        assert_eq!(
            sketch.step().await.unwrap(),
            StepOutcome::Oversized { length: 21 }
        );
        assert!(!sketch.output().is_high());
    }

    #[tokio::test]
    async fn closed_input_ends() {
        let (host, device) = tokio::io::duplex(64);
        drop(host);

        let mut sketch = LedSketch::setup(device, DeviceOutput::new(), &ChannelConfig::led());
        assert_eq!(sketch.step().await.unwrap(), StepOutcome::Closed);

        let (_, led) = sketch.into_parts();
        assert_eq!(led.level(), PinLevel::Low);
    }
}
