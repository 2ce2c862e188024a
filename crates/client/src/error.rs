// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fatal error taxonomy for session commands.
//!
//! Soft outcomes (not found, timed out, buffer full) are not errors;
//! they are enum values on each command's return type. Everything here
//! closes the session before it is returned.

use std::io;

use stalk_proto::ProtocolError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors from session commands.
#[derive(Debug, Error)]
pub enum Error {
    /// Any I/O-level failure: refused, reset, broken pipe, timeout,
    /// unexpected EOF. By the time this is returned the session is
    /// already closed; only an explicit `connect()` reopens it.
    #[error("transport failure: {0}")]
    Transport(#[from] io::Error),

    /// The server replied outside the protocol contract: an
    /// unrecognized status word, malformed arguments or payload, or a
    /// status this command can never produce. The session is closed
    /// since the stream framing may be desynchronized.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl Error {
    /// Fast local failure for commands issued on a closed session.
    pub(crate) fn closed() -> Self {
        Error::Transport(io::Error::new(io::ErrorKind::NotConnected, "session is closed"))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}
