//! Behavioral specifications for the chores CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, and exit codes against a daemon in a temp state dir.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/help.rs"]
mod cli_help;

// daemon/
#[path = "specs/daemon/lifecycle.rs"]
mod daemon_lifecycle;
#[path = "specs/daemon/logs.rs"]
mod daemon_logs;

// chores/
#[path = "specs/chores/claims.rs"]
mod chores_claims;
#[path = "specs/chores/manifest.rs"]
mod chores_manifest;
#[path = "specs/chores/rotation.rs"]
mod chores_rotation;
