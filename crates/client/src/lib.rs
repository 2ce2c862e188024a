// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client for the beanstalk work-queue protocol.
//!
//! A [`Session`] owns one TCP connection and exposes the command API:
//! enqueue ([`Session::put`]), reserve, delete, release, bury, touch,
//! peek, tube management, and statistics. Expected "could not complete
//! this time" results (job not found, queue empty, buffer full) are
//! ordinary outcome values; every transport failure is one uniform
//! [`Error::Transport`] that closes the session before it surfaces.
//!
//! The session never reconnects on its own. The supported recovery
//! idiom is to call [`Session::connect`] (a local no-op while the
//! session is open) before each command, and on a transport failure
//! back off and loop:
//!
//! ```no_run
//! # use stalk_client::{Error, ReserveOutcome, Session};
//! # async fn worker() -> Result<(), Error> {
//! let mut session = Session::new("localhost", 11300);
//! loop {
//!     session.connect().await?;
//!     match session.reserve().await {
//!         Ok(ReserveOutcome::Reserved(job)) => {
//!             // process, then acknowledge
//!             job.delete(&mut session).await?;
//!         }
//!         Ok(_) => continue,
//!         Err(_) => {
//!             // session is closed now; back off, then loop to reconnect
//!             tokio::time::sleep(std::time::Duration::from_millis(100)).await;
//!         }
//!     }
//! }
//! # }
//! ```

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
mod job;
mod outcome;
mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Error, Result};
pub use job::Job;
pub use outcome::{Ack, IgnoreOutcome, PutOutcome, ReleaseOutcome, ReserveOutcome};
pub use session::{PutOptions, Session, DEFAULT_PRIORITY, DEFAULT_TTR_SECS};
pub use stalk_proto::{ProtocolError, Stats};
