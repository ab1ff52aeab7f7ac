//! Shared helpers for CLI specs

use std::path::PathBuf;
use std::process::Output;
use std::time::{Duration, Instant};

use tempfile::TempDir;

/// Two kids and one chore of each interesting kind
pub const HOUSEHOLD: &str = r#"
[[kids]]
id = "ada"
name = "Ada"

[[kids]]
id = "bo"
name = "Bo"

[[chores]]
id = "dishes"
name = "Dishes"
assigned_kids = ["ada", "bo"]
criteria = "shared_first"
points = 5.0

[[chores]]
id = "trash"
name = "Trash"
assigned_kids = ["ada", "bo"]
criteria = "rotation_simple"
points = 2.0

[[chores]]
id = "bed"
name = "Make bed"
assigned_kids = ["ada", "bo"]
"#;

/// An isolated household: its own state dir and socket dir
pub struct Project {
    dir: TempDir,
    sockets: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            sockets: tempfile::tempdir().unwrap(),
        }
    }

    /// A project with [`HOUSEHOLD`] applied
    pub fn household() -> Self {
        let project = Self::empty();
        project.file("household.toml", HOUSEHOLD);
        project
            .chores()
            .args(&["chore", "apply", "household.toml"])
            .passes();
        project
    }

    pub fn state_dir(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    /// Write a file relative to the project root
    pub fn file(&self, path: &str, content: &str) {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }

    /// The command with this project's environment, for raw assertions
    pub fn command(&self) -> assert_cmd::Command {
        self.chores().cmd
    }

    pub fn chores(&self) -> CliBuilder {
        let mut cmd = assert_cmd::Command::cargo_bin("chores").unwrap();
        cmd.current_dir(self.dir.path())
            .env("CHORES_STATE_DIR", self.state_dir())
            .env("CHORES_SOCKET_DIR", self.sockets.path())
            .env("CHORES_DAEMON_BINARY", assert_cmd::cargo::cargo_bin("choresd"))
            .env("CHORES_TIMEOUT_CONNECT_MS", "10000")
            .env_remove("CHORES_LOG")
            .env_remove("RUST_LOG");
        CliBuilder { cmd }
    }
}

impl Drop for Project {
    fn drop(&mut self) {
        let _ = self.chores().cmd.args(["daemon", "stop"]).output();
    }
}

pub struct CliBuilder {
    cmd: assert_cmd::Command,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Run and require exit code 0
    pub fn passes(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        assert!(
            output.status.success(),
            "expected success, got {}\nstdout:\n{}\nstderr:\n{}",
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and require a non-zero exit
    pub fn fails(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        assert!(
            !output.status.success(),
            "expected failure\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        );
        RunAssert { output }
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout missing {:?}:\n{}",
            expected,
            stdout
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout has {:?}:\n{}",
            unexpected,
            stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr missing {:?}:\n{}",
            expected,
            stderr
        );
        self
    }

    /// Parse stdout as JSON (for `-o json`)
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).unwrap()
    }
}

/// Poll `condition` until it holds or `timeout_ms` passes
pub fn wait_for(timeout_ms: u64, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    condition()
}
