// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Async halves over a blocking `serialport` handle.
//!
//! The port is cloned once. One thread blocks on reads and forwards chunks
//! through a bounded channel, another drains a bounded channel of write and
//! flush requests into the port. The async halves only ever touch the
//! channels, and a full channel suspends the producer.

use std::fmt;
use std::io::{self, Read, Write};
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, StopBits};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::sync::mpsc::error::SendError;
use tokio::sync::mpsc::{self, OwnedPermit};
use tokio::sync::oneshot;

use super::ChannelConfig;
use crate::error::TransportError;

/// How long the reader thread blocks before checking for shutdown.
const PORT_POLL_INTERVAL: Duration = Duration::from_millis(50);

const READ_CHUNK: usize = 256;

/// Chunks buffered between the reader thread and [`SerialReader`].
const READ_QUEUE: usize = 64;

/// Requests buffered between [`SerialWriter`] and the writer thread.
const WRITE_QUEUE: usize = 64;

/// Opens `path` with `config` and returns its read and write halves.
///
/// # Errors
///
/// Returns `TransportError::Serial` if the port cannot be opened or cloned,
/// and `TransportError::Io` if a worker thread cannot be spawned.
pub fn open(
    path: &str,
    config: &ChannelConfig,
) -> Result<(SerialReader, SerialWriter), TransportError> {
    let port = serialport::new(path, config.baud_rate())
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(PORT_POLL_INTERVAL)
        .open()?;
    let write_port = port.try_clone()?;

    tracing::info!(port = %path, baud = config.baud_rate(), "Opened serial port");

    let (read_tx, read_rx) = mpsc::channel(READ_QUEUE);
    std::thread::Builder::new()
        .name(format!("serial-read {path}"))
        .spawn(move || read_loop(port, &read_tx))?;

    let (write_tx, write_rx) = mpsc::channel(WRITE_QUEUE);
    std::thread::Builder::new()
        .name(format!("serial-write {path}"))
        .spawn(move || write_loop(write_port, write_rx))?;

    Ok((SerialReader::new(read_rx), SerialWriter::new(write_tx)))
}

fn read_loop<R: Read>(mut port: R, tx: &mpsc::Sender<io::Result<Vec<u8>>>) {
    let mut buf = [0u8; READ_CHUNK];
    loop {
        match port.read(&mut buf) {
            Ok(0) => {
                tracing::debug!("Serial port reported end of input");
                break;
            }
            Ok(n) => {
                if tx.blocking_send(Ok(buf[..n].to_vec())).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                if tx.is_closed() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Serial read failed, closing reader");
                let _ = tx.blocking_send(Err(e));
                break;
            }
        }
    }
    tracing::debug!("Serial reader thread stopped");
}

enum WriteRequest {
    Data(Vec<u8>),
    Flush(oneshot::Sender<io::Result<()>>),
}

fn write_loop<W: Write>(mut port: W, mut rx: mpsc::Receiver<WriteRequest>) {
    let mut failure: Option<io::Error> = None;
    while let Some(request) = rx.blocking_recv() {
        match request {
            WriteRequest::Data(bytes) => {
                if failure.is_none()
                    && let Err(e) = port.write_all(&bytes)
                {
                    tracing::warn!(error = %e, "Serial write failed");
                    failure = Some(e);
                }
            }
            WriteRequest::Flush(ack) => {
                if let Some(e) = failure.take() {
                    rx.close();
                    let _ = ack.send(Err(e));
                    break;
                }
                let _ = ack.send(port.flush());
            }
        }
    }
    tracing::debug!("Serial writer thread stopped");
}

fn writer_stopped() -> io::Error {
    io::Error::new(
        io::ErrorKind::BrokenPipe,
        TransportError::ChannelClosed("serial writer stopped".to_string()),
    )
}

/// Read half of an open serial port.
///
/// Ends when the port reports end of input or the reader thread stops.
#[derive(Debug)]
pub struct SerialReader {
    rx: mpsc::Receiver<io::Result<Vec<u8>>>,
    pending: Vec<u8>,
    pos: usize,
}

impl SerialReader {
    fn new(rx: mpsc::Receiver<io::Result<Vec<u8>>>) -> Self {
        Self {
            rx,
            pending: Vec::new(),
            pos: 0,
        }
    }
}

impl AsyncRead for SerialReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        if this.pos >= this.pending.len() {
            match ready!(this.rx.poll_recv(cx)) {
                Some(Ok(bytes)) => {
                    this.pending = bytes;
                    this.pos = 0;
                }
                Some(Err(e)) => return Poll::Ready(Err(e)),
                // Reader thread gone: end of input.
                None => return Poll::Ready(Ok(())),
            }
        }

        let n = buf.remaining().min(this.pending.len() - this.pos);
        buf.put_slice(&this.pending[this.pos..this.pos + n]);
        this.pos += n;
        Poll::Ready(Ok(()))
    }
}

type Reservation =
    Pin<Box<dyn Future<Output = Result<OwnedPermit<WriteRequest>, SendError<()>>> + Send>>;

/// Write half of an open serial port.
///
/// Writes are queued to the writer thread and suspend while the queue is
/// full. A flush completes once the thread has written and flushed every
/// queued byte, and fails if any of those writes failed.
pub struct SerialWriter {
    tx: mpsc::Sender<WriteRequest>,
    reserving: Option<Reservation>,
    flushing: Option<oneshot::Receiver<io::Result<()>>>,
}

impl SerialWriter {
    fn new(tx: mpsc::Sender<WriteRequest>) -> Self {
        Self {
            tx,
            reserving: None,
            flushing: None,
        }
    }

    fn poll_permit(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<OwnedPermit<WriteRequest>>> {
        let tx = &self.tx;
        let reservation = self
            .reserving
            .get_or_insert_with(|| Box::pin(tx.clone().reserve_owned()));
        let result = ready!(reservation.as_mut().poll(cx));
        self.reserving = None;
        Poll::Ready(result.map_err(|_| writer_stopped()))
    }
}

impl fmt::Debug for SerialWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialWriter")
            .field("queued", &(self.tx.max_capacity() - self.tx.capacity()))
            .field("flushing", &self.flushing.is_some())
            .finish_non_exhaustive()
    }
}

impl AsyncWrite for SerialWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let permit = ready!(this.poll_permit(cx))?;
        permit.send(WriteRequest::Data(buf.to_vec()));
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        loop {
            if let Some(done) = this.flushing.as_mut() {
                let result = ready!(Pin::new(done).poll(cx));
                this.flushing = None;
                return Poll::Ready(result.unwrap_or_else(|_| Err(writer_stopped())));
            }

            let permit = ready!(this.poll_permit(cx))?;
            let (ack, done) = oneshot::channel();
            permit.send(WriteRequest::Flush(ack));
            this.flushing = Some(done);
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.poll_flush(cx)
    }
}
