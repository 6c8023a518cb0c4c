// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Delimited frame reading with bounded waits.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::error::TransportError;

/// How frames are cut out of the byte stream.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use sketchlink::transport::FrameConfig;
///
/// let config = FrameConfig::new(b'}')
///     .keep_delimiter(true)
///     .with_read_timeout(Duration::from_millis(10))
///     .with_max_len(256);
///
/// assert_eq!(config.delimiter(), b'}');
/// assert!(config.keeps_delimiter());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    delimiter: u8,
    keep_delimiter: bool,
    read_timeout: Duration,
    idle_timeout: Option<Duration>,
    max_len: usize,
}

impl FrameConfig {
    /// Default wait for the next bytes of a frame that has started.
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(1000);
    /// Default maximum frame length in bytes, delimiter included.
    pub const DEFAULT_MAX_LEN: usize = 1024;

    /// Creates a configuration for frames ending with `delimiter`.
    ///
    /// The delimiter is stripped, there is no idle timeout, and the read
    /// timeout and maximum length take their defaults.
    #[must_use]
    pub const fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            keep_delimiter: false,
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
            idle_timeout: None,
            max_len: Self::DEFAULT_MAX_LEN,
        }
    }

    /// Keeps the delimiter at the end of returned frames.
    #[must_use]
    pub const fn keep_delimiter(mut self, keep: bool) -> Self {
        self.keep_delimiter = keep;
        self
    }

    /// Sets how long to wait for more bytes once a frame has started.
    ///
    /// The timer restarts every time bytes arrive.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets how long to wait for the first byte of a frame.
    ///
    /// `None` waits until input arrives or the stream closes.
    #[must_use]
    pub const fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Sets the maximum frame length in bytes, delimiter included.
    #[must_use]
    pub const fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Returns the delimiter byte.
    #[must_use]
    pub const fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Returns whether the delimiter is kept in frames.
    #[must_use]
    pub const fn keeps_delimiter(&self) -> bool {
        self.keep_delimiter
    }

    /// Returns the read timeout.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Returns the idle timeout.
    #[must_use]
    pub const fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    /// Returns the maximum frame length.
    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.max_len
    }
}

/// Result of reading one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete frame was read.
    Frame(String),
    /// No bytes arrived within the read timeout. `partial` holds what was
    /// received before the wait expired and has been consumed.
    Timeout {
        /// Bytes received before the timeout.
        partial: String,
    },
    /// The frame grew past the maximum length. The whole frame, up to and
    /// including its delimiter, was discarded.
    Overflow {
        /// Configured maximum length.
        limit: usize,
        /// Bytes discarded.
        length: usize,
    },
    /// The stream ended. `partial` holds an unterminated trailing frame.
    Closed {
        /// Bytes received before end of input.
        partial: String,
    },
}

/// Reads delimited frames from an async byte stream.
///
/// Waiting is event driven: the reader suspends on the stream until bytes are
/// available, it never polls in a loop.
#[derive(Debug)]
pub struct FrameReader<R> {
    inner: BufReader<R>,
    config: FrameConfig,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Wraps `reader` with the given frame configuration.
    pub fn new(reader: R, config: FrameConfig) -> Self {
        Self {
            inner: BufReader::new(reader),
            config,
        }
    }

    /// Returns the frame configuration.
    #[must_use]
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Changes the maximum frame length for subsequent reads.
    pub fn set_max_len(&mut self, max_len: usize) {
        self.config = self.config.with_max_len(max_len);
    }

    /// Consumes the reader and returns the underlying stream.
    ///
    /// Bytes already buffered but not yet returned in a frame are lost.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }

    /// Suspends until at least one byte can be read.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Closed` at end of input,
    /// `TransportError::Timeout` if the idle timeout expires first, and
    /// `TransportError::Io` if the stream fails.
    pub async fn wait_readable(&mut self) -> Result<(), TransportError> {
        let available = match self.config.idle_timeout {
            Some(limit) => tokio::time::timeout(limit, self.inner.fill_buf())
                .await
                .map_err(|_| TransportError::Timeout(millis(limit)))??,
            None => self.inner.fill_buf().await?,
        };

        if available.is_empty() {
            Err(TransportError::Closed)
        } else {
            Ok(())
        }
    }

    /// Reads bytes up to the delimiter.
    ///
    /// Each wait for more bytes is bounded by the read timeout. Invalid
    /// UTF-8 is replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Io` if the stream fails.
    pub async fn read_frame(&mut self) -> Result<ReadOutcome, TransportError> {
        let FrameConfig {
            delimiter,
            keep_delimiter,
            read_timeout,
            max_len,
            ..
        } = self.config;

        let mut frame: Vec<u8> = Vec::new();
        let mut discarded = 0usize;

        loop {
            let Ok(chunk) = tokio::time::timeout(read_timeout, self.inner.fill_buf()).await else {
                if discarded > 0 {
                    return Ok(ReadOutcome::Overflow {
                        limit: max_len,
                        length: discarded,
                    });
                }
                tracing::trace!(bytes = frame.len(), "Frame read timed out");
                return Ok(ReadOutcome::Timeout {
                    partial: lossy(frame),
                });
            };
            let chunk = chunk?;

            if chunk.is_empty() {
                if discarded > 0 {
                    return Ok(ReadOutcome::Overflow {
                        limit: max_len,
                        length: discarded,
                    });
                }
                return Ok(ReadOutcome::Closed {
                    partial: lossy(frame),
                });
            }

            let (taken, complete) = match chunk.iter().position(|&b| b == delimiter) {
                Some(i) => (i + 1, true),
                None => (chunk.len(), false),
            };

            if discarded > 0 {
                discarded += taken;
            } else {
                frame.extend_from_slice(&chunk[..taken]);
                if frame.len() > max_len {
                    discarded = frame.len();
                    frame.clear();
                }
            }
            self.inner.consume(taken);

            if complete {
                if discarded > 0 {
                    tracing::debug!(limit = max_len, length = discarded, "Discarded oversized frame");
                    return Ok(ReadOutcome::Overflow {
                        limit: max_len,
                        length: discarded,
                    });
                }
                if !keep_delimiter {
                    frame.pop();
                }
                return Ok(ReadOutcome::Frame(lossy(frame)));
            }
        }
    }
}

fn lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}
