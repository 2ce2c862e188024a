// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job handles.
//!
//! A job is plain data: the server-assigned id and the opaque body.
//! Its operations delegate to the session that produced it, passed
//! back in by the caller; the handle carries no network state and can
//! never itself go stale. A job the server no longer knows surfaces as
//! the session's soft `NotFound` outcome, not a crash.

use stalk_proto::Stats;

use crate::{Ack, ReleaseOutcome, Result, Session};

/// A unit of work handed out by `reserve` or a peek.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    id: u64,
    body: Vec<u8>,
}

impl Job {
    pub(crate) fn new(id: u64, body: Vec<u8>) -> Self {
        Self { id, body }
    }

    /// Server-assigned id, unique among currently live jobs.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The job body, exactly as enqueued.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Delete (acknowledge) this job.
    pub async fn delete(&self, session: &mut Session) -> Result<Ack> {
        session.delete(self.id).await
    }

    /// Release this job back onto the ready queue.
    pub async fn release(
        &self,
        session: &mut Session,
        priority: u32,
        delay_secs: u32,
    ) -> Result<ReleaseOutcome> {
        session.release(self.id, priority, delay_secs).await
    }

    /// Bury this job.
    pub async fn bury(&self, session: &mut Session, priority: u32) -> Result<Ack> {
        session.bury(self.id, priority).await
    }

    /// Ask for more time before this job's TTR expires.
    pub async fn touch(&self, session: &mut Session) -> Result<Ack> {
        session.touch(self.id).await
    }

    /// Statistics for this job, or None once the server forgot it.
    pub async fn stats(&self, session: &mut Session) -> Result<Option<Stats>> {
        session.stats_job(self.id).await
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
