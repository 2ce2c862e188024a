// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outgoing command encoding.
//!
//! Every command is one line: a verb token followed by space-separated
//! arguments, CRLF terminated. `put` additionally carries a byte count
//! as its final argument, with the literal body bytes and another CRLF
//! on the next line. Verbs and argument order reproduce the beanstalkd
//! wire contract token-for-token.

use crate::framer::CRLF;

/// A single protocol command, borrowing its body and tube names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Put { priority: u32, delay: u32, ttr: u32, body: &'a [u8] },
    Use { tube: &'a str },
    Reserve,
    ReserveWithTimeout { seconds: u32 },
    Delete { id: u64 },
    Release { id: u64, priority: u32, delay: u32 },
    Bury { id: u64, priority: u32 },
    Touch { id: u64 },
    Watch { tube: &'a str },
    Ignore { tube: &'a str },
    Peek { id: u64 },
    PeekReady,
    PeekDelayed,
    PeekBuried,
    Kick { bound: u64 },
    StatsJob { id: u64 },
    StatsTube { tube: &'a str },
    Stats,
    ListTubes,
    ListTubesWatched,
    PauseTube { tube: &'a str, delay: u32 },
    Quit,
}

impl Command<'_> {
    /// The verb token, used in error reporting.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Put { .. } => "put",
            Command::Use { .. } => "use",
            Command::Reserve => "reserve",
            Command::ReserveWithTimeout { .. } => "reserve-with-timeout",
            Command::Delete { .. } => "delete",
            Command::Release { .. } => "release",
            Command::Bury { .. } => "bury",
            Command::Touch { .. } => "touch",
            Command::Watch { .. } => "watch",
            Command::Ignore { .. } => "ignore",
            Command::Peek { .. } => "peek",
            Command::PeekReady => "peek-ready",
            Command::PeekDelayed => "peek-delayed",
            Command::PeekBuried => "peek-buried",
            Command::Kick { .. } => "kick",
            Command::StatsJob { .. } => "stats-job",
            Command::StatsTube { .. } => "stats-tube",
            Command::Stats => "stats",
            Command::ListTubes => "list-tubes",
            Command::ListTubesWatched => "list-tubes-watched",
            Command::PauseTube { .. } => "pause-tube",
            Command::Quit => "quit",
        }
    }

    /// Render the command into wire bytes, including terminators.
    pub fn encode(&self) -> Vec<u8> {
        let line = match self {
            Command::Put { priority, delay, ttr, body } => {
                format!("put {priority} {delay} {ttr} {}", body.len())
            }
            Command::Use { tube } => format!("use {tube}"),
            Command::Reserve => "reserve".to_string(),
            Command::ReserveWithTimeout { seconds } => {
                format!("reserve-with-timeout {seconds}")
            }
            Command::Delete { id } => format!("delete {id}"),
            Command::Release { id, priority, delay } => {
                format!("release {id} {priority} {delay}")
            }
            Command::Bury { id, priority } => format!("bury {id} {priority}"),
            Command::Touch { id } => format!("touch {id}"),
            Command::Watch { tube } => format!("watch {tube}"),
            Command::Ignore { tube } => format!("ignore {tube}"),
            Command::Peek { id } => format!("peek {id}"),
            Command::PeekReady => "peek-ready".to_string(),
            Command::PeekDelayed => "peek-delayed".to_string(),
            Command::PeekBuried => "peek-buried".to_string(),
            Command::Kick { bound } => format!("kick {bound}"),
            Command::StatsJob { id } => format!("stats-job {id}"),
            Command::StatsTube { tube } => format!("stats-tube {tube}"),
            Command::Stats => "stats".to_string(),
            Command::ListTubes => "list-tubes".to_string(),
            Command::ListTubesWatched => "list-tubes-watched".to_string(),
            Command::PauseTube { tube, delay } => format!("pause-tube {tube} {delay}"),
            Command::Quit => "quit".to_string(),
        };
        let mut out = line.into_bytes();
        out.extend_from_slice(CRLF);
        if let Command::Put { body, .. } = self {
            out.extend_from_slice(body);
            out.extend_from_slice(CRLF);
        }
        out
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
