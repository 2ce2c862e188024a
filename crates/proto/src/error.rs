// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol-level errors: contract violations on the response stream.
//!
//! These are distinct from transport failures (plain `io::Error` out
//! of the framer) and from soft command outcomes, which are ordinary
//! values. A protocol error means the stream can no longer be trusted
//! to be in sync.

use thiserror::Error;

/// Errors from decoding server responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The first token of a status line is not in the protocol vocabulary.
    #[error("unrecognized status word in {0:?}")]
    UnknownStatus(String),

    /// A recognized status word arrived with missing or unparseable arguments.
    #[error("malformed {status} arguments in {line:?}")]
    BadArguments { status: &'static str, line: String },

    /// A recognized status word that the issued command can never produce.
    #[error("unexpected {status} in response to {verb}")]
    Unexpected { verb: &'static str, status: &'static str },

    /// The server reported an error on its side of the connection.
    #[error("server error: {0}")]
    Server(&'static str),

    /// A structured payload body could not be decoded.
    #[error("malformed structured payload: {0}")]
    Payload(String),
}
