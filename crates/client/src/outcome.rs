// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-command soft outcomes.
//!
//! The protocol defines, per command, a handful of "could not complete
//! right now" replies. They are ordinary values so that queue-empty
//! and contention conditions cost nothing and never close the
//! connection; callers match on them to distinguish "try again" from
//! "connection is dead" (which is [`crate::Error::Transport`]).

use crate::Job;

/// Outcome of `put`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// Job enqueued under this id.
    Inserted(u64),
    /// The server had no memory to grow the priority queue and buried
    /// the job instead. The job exists under this id.
    Buried(u64),
    /// Body exceeds the server's max-job-size.
    JobTooBig,
    /// Server is draining and accepts no new jobs.
    Draining,
    /// The server did not see a terminator after the body.
    ExpectedCrlf,
}

impl PutOutcome {
    /// The created job id, for both `Inserted` and `Buried`.
    pub fn id(&self) -> Option<u64> {
        match self {
            PutOutcome::Inserted(id) | PutOutcome::Buried(id) => Some(*id),
            _ => None,
        }
    }
}

/// Outcome of `reserve` / `reserve_with_timeout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveOutcome {
    Reserved(Job),
    /// The timeout elapsed with no job available.
    TimedOut,
    /// A job already reserved by this client is about to exceed its
    /// TTR; finish or touch it before reserving more.
    DeadlineSoon,
}

impl ReserveOutcome {
    pub fn job(self) -> Option<Job> {
        match self {
            ReserveOutcome::Reserved(job) => Some(job),
            _ => None,
        }
    }
}

/// Outcome of commands addressing one job or tube: `delete`, `bury`,
/// `touch`, `pause_tube`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    Acked,
    /// The id is unknown, not reserved by this client, or the tube
    /// does not exist.
    NotFound,
}

impl Ack {
    pub fn found(&self) -> bool {
        matches!(self, Ack::Acked)
    }
}

/// Outcome of `release`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Released,
    /// Out of memory growing the priority queue; the job was buried
    /// instead of released.
    Buried,
    NotFound,
}

/// Outcome of `ignore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreOutcome {
    /// Tube ignored; the count of tubes still watched.
    Watching(u32),
    /// The watch list cannot become empty.
    NotIgnored,
}
