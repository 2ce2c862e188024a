// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Byte-stream framing primitives.
//!
//! The framer is the single point where transport failures are
//! detected. It knows nothing about the protocol vocabulary: it reads
//! CRLF-terminated lines and exact-length binary bodies, and every
//! failure mode (I/O error, peer close, short read) surfaces as one
//! plain `io::Error`.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufStream};

/// Line terminator for both directions of the protocol.
pub(crate) const CRLF: &[u8] = b"\r\n";

/// Buffered framing over a raw byte stream.
pub struct Framer<S> {
    stream: BufStream<S>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Framer<S> {
    pub fn new(stream: S) -> Self {
        Self { stream: BufStream::new(stream) }
    }

    /// Write all bytes and flush, or fail.
    pub async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.stream.write_all(buf).await?;
        self.stream.flush().await
    }

    /// Read one line, up to and including CRLF, with the terminator
    /// stripped. A peer close before the terminator is reported as
    /// `UnexpectedEof`.
    pub async fn read_line(&mut self) -> io::Result<Vec<u8>> {
        let mut line = Vec::new();
        let n = self.stream.read_until(b'\n', &mut line).await?;
        if n == 0 || line.last() != Some(&b'\n') {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed mid-line",
            ));
        }
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Ok(line)
    }

    /// Read exactly `n` body bytes, then consume the trailing CRLF
    /// that follows every binary body. The terminator is discarded but
    /// must be present; anything else means the stream is out of sync.
    pub async fn read_body(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut body = vec![0u8; n];
        self.stream.read_exact(&mut body).await?;
        let mut terminator = [0u8; 2];
        self.stream.read_exact(&mut terminator).await?;
        if terminator != *CRLF {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "missing terminator after body",
            ));
        }
        Ok(body)
    }
}

#[cfg(test)]
#[path = "framer_tests.rs"]
mod tests;
