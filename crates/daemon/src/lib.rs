// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chores-daemon: the household's periodic driver
//!
//! `choresd` owns the chore manager, runs the scan on a timer and answers
//! action and query requests over a Unix socket. The protocol types are
//! exported for the CLI.

pub mod config;
pub mod lifecycle;
pub mod paths;
pub mod protocol;
pub mod server;

pub use config::{ConfigError, DaemonConfig};
pub use paths::Paths;
pub use protocol::{Query, Request, Response, PROTOCOL_VERSION};
