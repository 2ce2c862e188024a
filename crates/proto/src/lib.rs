// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol for the beanstalk work queue.
//!
//! Wire format: CRLF-terminated command/status lines, with
//! byte-count-prefixed binary bodies following `put` commands and
//! `RESERVED`/`FOUND`/`OK` statuses.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod command;
mod error;
mod framer;
mod payload;
mod status;

pub use command::Command;
pub use error::ProtocolError;
pub use framer::Framer;
pub use payload::{parse_list, parse_mapping, Stats};
pub use status::Status;
