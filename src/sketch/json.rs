// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON coordinate sketch.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use super::{Sketch, StepOutcome};
use crate::decoder::{CoordinateDecoder, diagnostic};
use crate::error::{DecodeError, TransportError};
use crate::output::OutputPin;
use crate::transport::{ChannelConfig, FrameConfig, FrameReader, ReadOutcome};
use crate::types::PinLevel;

/// Line terminator of report and diagnostic lines.
const LINE_END: &str = "\r\n";

/// Decodes `}`-terminated frames and reports the coordinates.
///
/// Input and output are separate streams so the two serial channels can be
/// wired either way; with a single port, pass its read and write halves.
///
/// On a failed decode the diagnostic line is written and the error pin is
/// raised. The pin latches: a later successful decode does not lower it.
#[derive(Debug)]
pub struct JsonSketch<R, W, P> {
    reader: FrameReader<R>,
    writer: W,
    error_led: P,
    decoder: CoordinateDecoder,
}

impl<R, W, P> JsonSketch<R, W, P>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    P: OutputPin,
{
    /// Builds the sketch reading from `input` and reporting to `output`.
    pub fn setup(input: R, output: W, error_led: P, channel: &ChannelConfig) -> Self {
        tracing::info!(
            baud = channel.baud_rate(),
            read_timeout_ms = crate::transport::millis(channel.read_timeout()),
            "JSON sketch ready"
        );
        let frames = FrameConfig::new(b'}')
            .keep_delimiter(true)
            .with_read_timeout(channel.read_timeout())
            .with_max_len(CoordinateDecoder::DEFAULT_CAPACITY);
        Self::with_frame_config(input, output, error_led, frames)
    }

    /// Builds the sketch with explicit framing.
    ///
    /// The delimiter should be kept, otherwise every frame is incomplete JSON.
    pub fn with_frame_config(input: R, output: W, error_led: P, frames: FrameConfig) -> Self {
        Self {
            reader: FrameReader::new(input, frames),
            writer: output,
            error_led,
            decoder: CoordinateDecoder::default(),
        }
    }

    /// Replaces the decoder, for a different frame capacity.
    ///
    /// The reader's maximum frame length follows the decoder capacity.
    #[must_use]
    pub fn with_decoder(mut self, decoder: CoordinateDecoder) -> Self {
        self.reader.set_max_len(decoder.capacity());
        self.decoder = decoder;
        self
    }

    /// Returns the error pin.
    pub fn error_led(&self) -> &P {
        &self.error_led
    }

    /// Returns the error pin mutably.
    pub fn error_led_mut(&mut self) -> &mut P {
        &mut self.error_led
    }

    /// Consumes the sketch and returns its streams and error pin.
    pub fn into_parts(self) -> (R, W, P) {
        (self.reader.into_inner(), self.writer, self.error_led)
    }

    async fn decode_frame(&mut self, frame: &str) -> Result<StepOutcome, TransportError> {
        match self.decoder.decode(frame) {
            Ok(coordinate) => {
                tracing::debug!(x = coordinate.x, y = coordinate.y, "Decoded coordinate");
                self.write_line(&coordinate.to_string()).await?;
                Ok(StepOutcome::Reported(coordinate))
            }
            Err(e) => self.fail(e).await,
        }
    }

    async fn fail(&mut self, error: DecodeError) -> Result<StepOutcome, TransportError> {
        tracing::warn!(error = %error, "Frame decode failed");
        self.write_line(&diagnostic(&error)).await?;
        self.error_led.write(PinLevel::High);
        Ok(StepOutcome::DecodeFailed(error))
    }

    async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(LINE_END.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

impl<R, W, P> Sketch for JsonSketch<R, W, P>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    P: OutputPin,
{
    fn name(&self) -> &'static str {
        "json"
    }

    async fn step(&mut self) -> Result<StepOutcome, TransportError> {
        match self.reader.wait_readable().await {
            Ok(()) => {}
            Err(TransportError::Closed) => return Ok(StepOutcome::Closed),
            Err(TransportError::Timeout(_)) => return Ok(StepOutcome::Idle),
            Err(e) => return Err(e),
        }

        match self.reader.read_frame().await? {
            ReadOutcome::Frame(frame) => self.decode_frame(&frame).await,
            ReadOutcome::Timeout { partial } => {
                if partial.trim().is_empty() {
                    Ok(StepOutcome::Idle)
                } else {
                    self.fail(DecodeError::IncompleteInput).await
                }
            }
            ReadOutcome::Closed { partial } => {
                if partial.trim().is_empty() {
                    Ok(StepOutcome::Closed)
                } else {
                    self.fail(DecodeError::IncompleteInput).await
                }
            }
            ReadOutcome::Overflow { limit, length } => {
                self.fail(DecodeError::NoMemory {
                    capacity: limit,
                    actual: length,
                })
                .await
            }
        }
    }
}
