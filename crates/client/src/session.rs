// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session lifecycle and the command API.
//!
//! A session has two observable states: Open (a framer is present) and
//! Closed. It opens only via [`Session::connect`] and closes on
//! explicit [`Session::close`] or on any transport failure or protocol
//! violation during a command. Nothing here retries or reconnects;
//! `connect()` consults only the local closed flag and never probes a
//! stream that is already open, so a dead-but-undetected connection is
//! discovered by the next command's failure.

use std::time::Duration;

use stalk_proto::{parse_list, parse_mapping, Command, Framer, ProtocolError, Stats, Status};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::{
    Ack, Error, IgnoreOutcome, Job, PutOutcome, ReleaseOutcome, ReserveOutcome, Result,
};

/// Priority assigned to jobs unless the caller picks one. Lower is
/// more urgent; this sits in the middle of the range.
pub const DEFAULT_PRIORITY: u32 = 1 << 31;

/// Default time-to-run granted to a reserved job.
pub const DEFAULT_TTR_SECS: u32 = 120;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(50);
const DEFAULT_TUBE: &str = "default";

/// Enqueue parameters for [`Session::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PutOptions {
    pub priority: u32,
    pub delay_secs: u32,
    pub ttr_secs: u32,
}

impl Default for PutOptions {
    fn default() -> Self {
        Self { priority: DEFAULT_PRIORITY, delay_secs: 0, ttr_secs: DEFAULT_TTR_SECS }
    }
}

/// One connection to a work-queue server.
///
/// Commands are sequential request/response calls on one transport;
/// the `&mut self` receivers make concurrent use of a session a
/// compile-time error. Use one session per worker task.
pub struct Session {
    host: String,
    port: u16,
    connect_timeout: Duration,
    /// Tube currently used for `put`, mirroring server state so that
    /// re-using the same tube skips the round trip.
    tube: String,
    framer: Option<Framer<TcpStream>>,
    connects: u64,
}

impl Session {
    /// Create a disconnected session. Call [`Session::connect`] before
    /// issuing commands.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            tube: DEFAULT_TUBE.to_string(),
            framer: None,
            connects: 0,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// True once the session has been explicitly closed or auto-closed
    /// by a failure. False means no failure has been observed since
    /// the last connect, not that the peer is alive.
    pub fn is_closed(&self) -> bool {
        self.framer.is_none()
    }

    /// Number of successful connects over this session's lifetime.
    pub fn connect_count(&self) -> u64 {
        self.connects
    }

    /// The tube `put` currently targets.
    pub fn using(&self) -> &str {
        &self.tube
    }

    /// Open the connection, unless already open.
    ///
    /// On an open session this only reads the local closed flag and
    /// performs no I/O. Liveness is discovered lazily by the next real
    /// command; callers build reconnection loops around that.
    pub async fn connect(&mut self) -> Result<()> {
        if self.framer.is_some() {
            return Ok(());
        }
        let stream = tokio::time::timeout(
            self.connect_timeout,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await
        .map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timed out")
        })??;
        self.framer = Some(Framer::new(stream));
        self.connects += 1;
        // Fresh connection, fresh server-side state
        self.tube = DEFAULT_TUBE.to_string();
        debug!(host = %self.host, port = self.port, connects = self.connects, "connected");
        Ok(())
    }

    /// Close the connection. Idempotent, never fails; sends a
    /// best-effort `quit` before dropping the transport.
    pub async fn close(&mut self) {
        if let Some(mut framer) = self.framer.take() {
            let _ = framer.write_all(&Command::Quit.encode()).await;
            debug!("session closed");
        }
    }

    // -- queue operations --

    /// Enqueue a job body into the currently used tube.
    pub async fn put(&mut self, body: &[u8], opts: PutOptions) -> Result<PutOutcome> {
        let cmd = Command::Put {
            priority: opts.priority,
            delay: opts.delay_secs,
            ttr: opts.ttr_secs,
            body,
        };
        match self.interact(cmd).await?.0 {
            Status::Inserted(id) => Ok(PutOutcome::Inserted(id)),
            Status::Buried(Some(id)) => Ok(PutOutcome::Buried(id)),
            Status::JobTooBig => Ok(PutOutcome::JobTooBig),
            Status::Draining => Ok(PutOutcome::Draining),
            Status::ExpectedCrlf => Ok(PutOutcome::ExpectedCrlf),
            other => self.reject("put", other),
        }
    }

    /// Reserve a job from the watched tubes, blocking until one is
    /// ready. The only unbounded wait in the API.
    pub async fn reserve(&mut self) -> Result<ReserveOutcome> {
        self.reserve_inner(Command::Reserve).await
    }

    /// Reserve with a server-side timeout in seconds; `TimedOut` when
    /// it elapses with nothing to hand out.
    pub async fn reserve_with_timeout(&mut self, seconds: u32) -> Result<ReserveOutcome> {
        self.reserve_inner(Command::ReserveWithTimeout { seconds }).await
    }

    async fn reserve_inner(&mut self, cmd: Command<'_>) -> Result<ReserveOutcome> {
        let verb = cmd.verb();
        match self.interact(cmd).await? {
            (Status::Reserved { id, .. }, Some(body)) => {
                Ok(ReserveOutcome::Reserved(Job::new(id, body)))
            }
            (Status::TimedOut, _) => Ok(ReserveOutcome::TimedOut),
            (Status::DeadlineSoon, _) => Ok(ReserveOutcome::DeadlineSoon),
            (other, _) => self.reject(verb, other),
        }
    }

    /// Delete (acknowledge) a job.
    pub async fn delete(&mut self, id: u64) -> Result<Ack> {
        match self.interact(Command::Delete { id }).await?.0 {
            Status::Deleted => Ok(Ack::Acked),
            Status::NotFound => Ok(Ack::NotFound),
            other => self.reject("delete", other),
        }
    }

    /// Release a reserved job back onto the ready queue.
    pub async fn release(&mut self, id: u64, priority: u32, delay_secs: u32) -> Result<ReleaseOutcome> {
        let cmd = Command::Release { id, priority, delay: delay_secs };
        match self.interact(cmd).await?.0 {
            Status::Released => Ok(ReleaseOutcome::Released),
            Status::Buried(_) => Ok(ReleaseOutcome::Buried),
            Status::NotFound => Ok(ReleaseOutcome::NotFound),
            other => self.reject("release", other),
        }
    }

    /// Bury a reserved job.
    pub async fn bury(&mut self, id: u64, priority: u32) -> Result<Ack> {
        match self.interact(Command::Bury { id, priority }).await?.0 {
            Status::Buried(_) => Ok(Ack::Acked),
            Status::NotFound => Ok(Ack::NotFound),
            other => self.reject("bury", other),
        }
    }

    /// Request more time to work on a reserved job.
    pub async fn touch(&mut self, id: u64) -> Result<Ack> {
        match self.interact(Command::Touch { id }).await?.0 {
            Status::Touched => Ok(Ack::Acked),
            Status::NotFound => Ok(Ack::NotFound),
            other => self.reject("touch", other),
        }
    }

    /// Kick at most `bound` buried (or delayed) jobs onto the ready
    /// queue; returns how many were kicked.
    pub async fn kick(&mut self, bound: u64) -> Result<u64> {
        match self.interact(Command::Kick { bound }).await?.0 {
            Status::Kicked(Some(count)) => Ok(count),
            other => self.reject("kick", other),
        }
    }

    // -- peeks --

    /// Peek at a job by id without reserving it.
    pub async fn peek(&mut self, id: u64) -> Result<Option<Job>> {
        self.peek_inner(Command::Peek { id }).await
    }

    /// Peek at the next ready job in the used tube.
    pub async fn peek_ready(&mut self) -> Result<Option<Job>> {
        self.peek_inner(Command::PeekReady).await
    }

    /// Peek at the delayed job closest to becoming ready.
    pub async fn peek_delayed(&mut self) -> Result<Option<Job>> {
        self.peek_inner(Command::PeekDelayed).await
    }

    /// Peek at the next buried job.
    pub async fn peek_buried(&mut self) -> Result<Option<Job>> {
        self.peek_inner(Command::PeekBuried).await
    }

    async fn peek_inner(&mut self, cmd: Command<'_>) -> Result<Option<Job>> {
        let verb = cmd.verb();
        match self.interact(cmd).await? {
            (Status::Found { id, .. }, Some(body)) => Ok(Some(Job::new(id, body))),
            (Status::NotFound, _) => Ok(None),
            (other, _) => self.reject(verb, other),
        }
    }

    // -- tube management --

    /// Switch the tube `put` targets. A no-op without I/O when the
    /// tube is already in use.
    pub async fn use_tube(&mut self, tube: &str) -> Result<()> {
        if self.tube == tube {
            return Ok(());
        }
        match self.interact(Command::Use { tube }).await?.0 {
            Status::Using(name) => {
                self.tube = name;
                Ok(())
            }
            other => self.reject("use", other),
        }
    }

    /// Add a tube to the reserve watch list; returns the watch count.
    pub async fn watch(&mut self, tube: &str) -> Result<u32> {
        match self.interact(Command::Watch { tube }).await?.0 {
            Status::Watching(count) => Ok(count),
            other => self.reject("watch", other),
        }
    }

    /// Remove a tube from the watch list.
    pub async fn ignore(&mut self, tube: &str) -> Result<IgnoreOutcome> {
        match self.interact(Command::Ignore { tube }).await?.0 {
            Status::Watching(count) => Ok(IgnoreOutcome::Watching(count)),
            Status::NotIgnored => Ok(IgnoreOutcome::NotIgnored),
            other => self.reject("ignore", other),
        }
    }

    /// Pause a tube: no job in it may be reserved for `delay_secs`.
    pub async fn pause_tube(&mut self, tube: &str, delay_secs: u32) -> Result<Ack> {
        match self.interact(Command::PauseTube { tube, delay: delay_secs }).await?.0 {
            Status::Paused => Ok(Ack::Acked),
            Status::NotFound => Ok(Ack::NotFound),
            other => self.reject("pause-tube", other),
        }
    }

    /// All tubes known to the server.
    pub async fn list_tubes(&mut self) -> Result<Vec<String>> {
        match self.interact(Command::ListTubes).await? {
            (Status::Ok { .. }, Some(body)) => self.parse(parse_list(&body)),
            (other, _) => self.reject("list-tubes", other),
        }
    }

    /// Tubes currently on this session's watch list.
    pub async fn watched_tubes(&mut self) -> Result<Vec<String>> {
        match self.interact(Command::ListTubesWatched).await? {
            (Status::Ok { .. }, Some(body)) => self.parse(parse_list(&body)),
            (other, _) => self.reject("list-tubes-watched", other),
        }
    }

    // -- statistics --

    /// Server-wide statistics.
    pub async fn stats(&mut self) -> Result<Stats> {
        match self.interact(Command::Stats).await? {
            (Status::Ok { .. }, Some(body)) => self.parse(parse_mapping(&body)),
            (other, _) => self.reject("stats", other),
        }
    }

    /// Statistics for one tube, or None if it does not exist.
    pub async fn stats_tube(&mut self, tube: &str) -> Result<Option<Stats>> {
        match self.interact(Command::StatsTube { tube }).await? {
            (Status::Ok { .. }, Some(body)) => self.parse(parse_mapping(&body)).map(Some),
            (Status::NotFound, _) => Ok(None),
            (other, _) => self.reject("stats-tube", other),
        }
    }

    /// Statistics for one job, or None if its id is unknown.
    pub async fn stats_job(&mut self, id: u64) -> Result<Option<Stats>> {
        match self.interact(Command::StatsJob { id }).await? {
            (Status::Ok { .. }, Some(body)) => self.parse(parse_mapping(&body)).map(Some),
            (Status::NotFound, _) => Ok(None),
            (other, _) => self.reject("stats-job", other),
        }
    }

    // -- internals --

    /// Send one command and read its status line plus any body.
    ///
    /// Every failure path drops the transport before returning, so the
    /// caller's error handler always observes `is_closed() == true`.
    async fn interact(&mut self, cmd: Command<'_>) -> Result<(Status, Option<Vec<u8>>)> {
        let verb = cmd.verb();
        let framer = self.framer.as_mut().ok_or_else(Error::closed)?;
        match Self::exchange(framer, cmd).await {
            Ok((status, body)) => {
                debug!(verb, status = status.word(), "command completed");
                Ok((status, body))
            }
            Err(e) => {
                self.framer = None;
                warn!(verb, error = %e, "command failed; session closed");
                Err(e)
            }
        }
    }

    async fn exchange(
        framer: &mut Framer<TcpStream>,
        cmd: Command<'_>,
    ) -> Result<(Status, Option<Vec<u8>>)> {
        framer.write_all(&cmd.encode()).await?;
        let line = framer.read_line().await?;
        let status = Status::parse(&line)?;
        if let Some(err) = status.server_error() {
            return Err(err.into());
        }
        let body = match status.body_len() {
            Some(n) => Some(framer.read_body(n).await?),
            None => None,
        };
        Ok((status, body))
    }

    /// A recognized status the issued command can never produce.
    /// Closes the session: the exchange may have left state we no
    /// longer understand.
    fn reject<T>(&mut self, verb: &'static str, status: Status) -> Result<T> {
        self.framer = None;
        warn!(verb, status = status.word(), "unexpected status; session closed");
        Err(ProtocolError::Unexpected { verb, status: status.word() }.into())
    }

    /// Map payload decode failures through the defensive close.
    fn parse<T>(&mut self, parsed: std::result::Result<T, ProtocolError>) -> Result<T> {
        match parsed {
            Ok(value) => Ok(value),
            Err(e) => {
                self.framer = None;
                warn!(error = %e, "malformed payload; session closed");
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("closed", &self.is_closed())
            .field("tube", &self.tube)
            .finish()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
