// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status line decoding.
//!
//! The first whitespace-separated token of a response line is the
//! status word; remaining tokens are arguments. The vocabulary is
//! closed: an unrecognized word is a contract violation, never a soft
//! failure.

use crate::ProtocolError;

/// A decoded status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// `INSERTED <id>` — job enqueued.
    Inserted(u64),
    /// `BURIED [<id>]` — with an id in reply to `put` (the server ran
    /// out of memory growing the priority queue), bare in reply to
    /// `bury`/`release`.
    Buried(Option<u64>),
    /// `EXPECTED_CRLF` — the put body was not followed by a terminator.
    ExpectedCrlf,
    /// `JOB_TOO_BIG` — body exceeds the server's max-job-size.
    JobTooBig,
    /// `DRAINING` — server is in drain mode and accepts no new jobs.
    Draining,
    /// `USING <tube>` — reply to `use`.
    Using(String),
    /// `DEADLINE_SOON` — a reserved job's TTR is about to expire.
    DeadlineSoon,
    /// `TIMED_OUT` — reserve-with-timeout expired with no job.
    TimedOut,
    /// `RESERVED <id> <bytes>` — a body of `bytes` bytes follows.
    Reserved { id: u64, bytes: usize },
    /// `DELETED`
    Deleted,
    /// `NOT_FOUND` — the job id is unknown, not reserved by this
    /// client, or the tube does not exist.
    NotFound,
    /// `RELEASED`
    Released,
    /// `TOUCHED`
    Touched,
    /// `WATCHING <count>` — reply to `watch`/`ignore`.
    Watching(u32),
    /// `NOT_IGNORED` — cannot ignore the only watched tube.
    NotIgnored,
    /// `FOUND <id> <bytes>` — peek result, body follows.
    Found { id: u64, bytes: usize },
    /// `KICKED [<count>]`
    Kicked(Option<u64>),
    /// `OK <bytes>` — a structured payload of `bytes` bytes follows.
    Ok { bytes: usize },
    /// `PAUSED` — reply to `pause-tube`.
    Paused,
    /// `OUT_OF_MEMORY` — server-side allocation failure.
    OutOfMemory,
    /// `INTERNAL_ERROR` — server bug.
    InternalError,
    /// `BAD_FORMAT` — the server rejected our command line framing.
    BadFormat,
    /// `UNKNOWN_COMMAND` — the server did not recognize our verb.
    UnknownCommand,
}

impl Status {
    /// Decode one terminator-stripped status line.
    pub fn parse(line: &[u8]) -> Result<Status, ProtocolError> {
        let text = std::str::from_utf8(line)
            .map_err(|_| ProtocolError::UnknownStatus(format!("{:?}", line)))?;
        let mut tokens = text.split_ascii_whitespace();
        let word = tokens
            .next()
            .ok_or_else(|| ProtocolError::UnknownStatus(String::new()))?;
        let args: Vec<&str> = tokens.collect();

        let bad = |status: &'static str| ProtocolError::BadArguments {
            status,
            line: text.to_string(),
        };

        let status = match word {
            "INSERTED" => Status::Inserted(parse_arg(&args, 0).ok_or_else(|| bad("INSERTED"))?),
            "BURIED" => match args.first() {
                Some(_) => Status::Buried(Some(parse_arg(&args, 0).ok_or_else(|| bad("BURIED"))?)),
                None => Status::Buried(None),
            },
            "EXPECTED_CRLF" => Status::ExpectedCrlf,
            "JOB_TOO_BIG" => Status::JobTooBig,
            "DRAINING" => Status::Draining,
            "USING" => Status::Using(
                args.first().map(|s| s.to_string()).ok_or_else(|| bad("USING"))?,
            ),
            "DEADLINE_SOON" => Status::DeadlineSoon,
            "TIMED_OUT" => Status::TimedOut,
            "RESERVED" => Status::Reserved {
                id: parse_arg(&args, 0).ok_or_else(|| bad("RESERVED"))?,
                bytes: parse_arg(&args, 1).ok_or_else(|| bad("RESERVED"))?,
            },
            "DELETED" => Status::Deleted,
            "NOT_FOUND" => Status::NotFound,
            "RELEASED" => Status::Released,
            "TOUCHED" => Status::Touched,
            "WATCHING" => Status::Watching(parse_arg(&args, 0).ok_or_else(|| bad("WATCHING"))?),
            "NOT_IGNORED" => Status::NotIgnored,
            "FOUND" => Status::Found {
                id: parse_arg(&args, 0).ok_or_else(|| bad("FOUND"))?,
                bytes: parse_arg(&args, 1).ok_or_else(|| bad("FOUND"))?,
            },
            "KICKED" => match args.first() {
                Some(_) => Status::Kicked(Some(parse_arg(&args, 0).ok_or_else(|| bad("KICKED"))?)),
                None => Status::Kicked(None),
            },
            "OK" => Status::Ok { bytes: parse_arg(&args, 0).ok_or_else(|| bad("OK"))? },
            "PAUSED" => Status::Paused,
            "OUT_OF_MEMORY" => Status::OutOfMemory,
            "INTERNAL_ERROR" => Status::InternalError,
            "BAD_FORMAT" => Status::BadFormat,
            "UNKNOWN_COMMAND" => Status::UnknownCommand,
            _ => return Err(ProtocolError::UnknownStatus(text.to_string())),
        };
        Ok(status)
    }

    /// The status word as it appears on the wire.
    pub fn word(&self) -> &'static str {
        match self {
            Status::Inserted(_) => "INSERTED",
            Status::Buried(_) => "BURIED",
            Status::ExpectedCrlf => "EXPECTED_CRLF",
            Status::JobTooBig => "JOB_TOO_BIG",
            Status::Draining => "DRAINING",
            Status::Using(_) => "USING",
            Status::DeadlineSoon => "DEADLINE_SOON",
            Status::TimedOut => "TIMED_OUT",
            Status::Reserved { .. } => "RESERVED",
            Status::Deleted => "DELETED",
            Status::NotFound => "NOT_FOUND",
            Status::Released => "RELEASED",
            Status::Touched => "TOUCHED",
            Status::Watching(_) => "WATCHING",
            Status::NotIgnored => "NOT_IGNORED",
            Status::Found { .. } => "FOUND",
            Status::Kicked(_) => "KICKED",
            Status::Ok { .. } => "OK",
            Status::Paused => "PAUSED",
            Status::OutOfMemory => "OUT_OF_MEMORY",
            Status::InternalError => "INTERNAL_ERROR",
            Status::BadFormat => "BAD_FORMAT",
            Status::UnknownCommand => "UNKNOWN_COMMAND",
        }
    }

    /// Byte count of the body that follows this status, if any.
    pub fn body_len(&self) -> Option<usize> {
        match self {
            Status::Reserved { bytes, .. } | Status::Found { bytes, .. } | Status::Ok { bytes } => {
                Some(*bytes)
            }
            _ => None,
        }
    }

    /// The server-side error words. These are recognized vocabulary
    /// but fatal for the call that received them.
    pub fn server_error(&self) -> Option<ProtocolError> {
        match self {
            Status::OutOfMemory | Status::InternalError | Status::BadFormat
            | Status::UnknownCommand => Some(ProtocolError::Server(self.word())),
            _ => None,
        }
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[&str], index: usize) -> Option<T> {
    args.get(index).and_then(|s| s.parse().ok())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
