// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host side of a sketch connection.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::command::Command;
use crate::error::{Error, TransportError, ValueError};
use crate::transport::{FrameConfig, FrameReader, ReadOutcome};
use crate::types::{Coordinate, PinReading};

/// Configuration of a [`HostLink`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use sketchlink::host::HostLinkConfig;
///
/// let config = HostLinkConfig::new().with_read_timeout(Duration::from_millis(20));
/// assert_eq!(config.read_timeout(), Duration::from_millis(20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostLinkConfig {
    read_timeout: Duration,
    max_line_len: usize,
}

impl HostLinkConfig {
    /// Default read timeout.
    ///
    /// Short enough to poll once per frame of a render loop without stalling it.
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(1);
    /// Default maximum reply line length.
    pub const DEFAULT_MAX_LINE_LEN: usize = FrameConfig::DEFAULT_MAX_LEN;

    /// Creates a configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
            max_line_len: Self::DEFAULT_MAX_LINE_LEN,
        }
    }

    /// Sets the read timeout.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the maximum reply line length.
    #[must_use]
    pub const fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    /// Returns the read timeout.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Returns the maximum reply line length.
    #[must_use]
    pub const fn max_line_len(&self) -> usize {
        self.max_line_len
    }
}

impl Default for HostLinkConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes commands and coordinates to a sketch and reads its reply lines.
///
/// # Examples
///
/// ```
/// use sketchlink::command::LedCommand;
/// use sketchlink::host::{HostLink, HostLinkConfig};
/// use tokio::io::AsyncReadExt;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> sketchlink::Result<()> {
/// let (host, mut device) = tokio::io::duplex(64);
/// let (reader, writer) = tokio::io::split(host);
/// let mut link = HostLink::new(reader, writer, HostLinkConfig::new());
///
/// link.send_command(&LedCommand::On).await?;
///
/// let mut buf = [0u8; 7];
/// device.read_exact(&mut buf).await.unwrap();
/// assert_eq!(&buf, b"LED ON\n");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HostLink<R, W> {
    reader: FrameReader<R>,
    writer: W,
    pending: String,
    discarding: bool,
}

impl<R, W> HostLink<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a link over the given streams.
    pub fn new(reader: R, writer: W, config: HostLinkConfig) -> Self {
        let frames = FrameConfig::new(b'\n')
            .with_read_timeout(config.read_timeout())
            .with_max_len(config.max_line_len());
        Self {
            reader: FrameReader::new(reader, frames),
            writer,
            pending: String::new(),
            discarding: false,
        }
    }

    /// Writes `message` followed by `\n`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Io` if the write fails.
    pub async fn write_line(&mut self, message: &str) -> Result<(), TransportError> {
        tracing::trace!(message = %message, "Writing line");
        self.write(format!("{message}\n").as_bytes()).await
    }

    /// Sends a command line.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Io` if the write fails.
    pub async fn send_command<C: Command>(&mut self, command: &C) -> Result<(), TransportError> {
        tracing::debug!(command = %command.text(), "Sending command");
        self.write(command.wire_line().as_bytes()).await
    }

    /// Sends a coordinate as compact JSON with no terminator.
    ///
    /// The receiving sketch frames on the closing brace.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::NonFiniteCoordinate` for NaN or infinite
    /// components, which have no JSON form, and `TransportError::Io` if the
    /// write fails.
    pub async fn send_coordinate(&mut self, coordinate: &Coordinate) -> Result<(), Error> {
        if !coordinate.x.is_finite() {
            return Err(ValueError::NonFiniteCoordinate("x").into());
        }
        if !coordinate.y.is_finite() {
            return Err(ValueError::NonFiniteCoordinate("y").into());
        }

        let json = serde_json::to_string(coordinate)
            .map_err(|e| TransportError::Io(std::io::Error::other(e)))?;
        tracing::debug!(json = %json, "Sending coordinate");
        self.write(json.as_bytes()).await?;
        Ok(())
    }

    /// Reads one reply line, without its `\r\n` terminator.
    ///
    /// Returns `Ok(None)` if no complete line arrives within the read
    /// timeout. Bytes of an unfinished line are kept and completed by a
    /// later call. A line that grows past the maximum length across calls
    /// is dropped through its terminator.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Closed` when the stream has ended and
    /// `TransportError::Io` if the read fails.
    pub async fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        let max_len = self.reader.config().max_len();

        match self.reader.read_frame().await? {
            ReadOutcome::Frame(line) => {
                if std::mem::take(&mut self.discarding) {
                    tracing::debug!("Dropped the tail of an oversized reply line");
                    return Ok(None);
                }
                // Terminator counts toward the limit, as in the reader.
                if self.pending.len() + line.len() + 1 > max_len {
                    self.discard(max_len, line.len());
                    return Ok(None);
                }
                let mut line = std::mem::take(&mut self.pending) + &line;
                if line.ends_with('\r') {
                    line.pop();
                }
                Ok(Some(line))
            }
            ReadOutcome::Timeout { partial } => {
                if self.discarding {
                    return Ok(None);
                }
                if self.pending.len() + partial.len() > max_len {
                    self.discard(max_len, partial.len());
                    self.discarding = true;
                } else {
                    self.pending.push_str(&partial);
                }
                Ok(None)
            }
            ReadOutcome::Overflow { length, .. } => {
                tracing::warn!(length, "Discarding oversized reply line");
                self.pending.clear();
                self.discarding = false;
                Ok(None)
            }
            ReadOutcome::Closed { partial } => {
                if !partial.is_empty() || !self.pending.is_empty() {
                    tracing::debug!("Stream closed with an unterminated reply line");
                }
                Err(TransportError::Closed)
            }
        }
    }

    /// Reads one reply line and parses it as a pin report.
    ///
    /// Returns `Ok(None)` on timeout.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the line is not a pin report, and the errors
    /// of [`Self::read_line`].
    pub async fn read_pin_data(&mut self, separator: char) -> Result<Option<PinReading>, Error> {
        let Some(line) = self.read_line().await? else {
            return Ok(None);
        };
        match PinReading::parse(&line, separator) {
            Ok(reading) => Ok(Some(reading)),
            Err(e) => {
                tracing::warn!(line = %line, "Data was unable to be parsed");
                Err(e.into())
            }
        }
    }

    /// Consumes the link and returns its streams.
    pub fn into_parts(self) -> (R, W) {
        (self.reader.into_inner(), self.writer)
    }

    fn discard(&mut self, limit: usize, incoming: usize) {
        tracing::warn!(
            limit,
            length = self.pending.len() + incoming,
            "Discarding oversized reply line"
        );
        self.pending.clear();
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
