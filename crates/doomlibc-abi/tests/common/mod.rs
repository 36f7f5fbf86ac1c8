//! Child-process runner for tests whose subject never returns.
//!
//! A test calls [`in_child`] first. In the parent it re-executes the test
//! binary filtered down to itself, with [`CHILD_ENV`] set, and inspects the
//! child's exit status and output. In the child it performs the call.

#![allow(dead_code)]

use std::process::{Command, ExitStatus};

pub const CHILD_ENV: &str = "DOOMLIBC_TEST_CHILD";

const KNOBS: [&str; 3] = ["DOOMLIBC_TRAP", "DOOMLIBC_MKDIR", "DOOMLIBC_LOG"];

#[derive(Debug)]
pub struct ChildRun {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ChildRun {
    /// Occurrences of `needle` on stderr.
    pub fn stderr_count(&self, needle: &str) -> usize {
        self.stderr.matches(needle).count()
    }
}

/// Value of [`CHILD_ENV`] when running as a child.
pub fn in_child() -> Option<String> {
    std::env::var(CHILD_ENV).ok()
}

/// Re-run the single test `test_name` in a child process.
///
/// `role` is what the child sees through [`in_child`]. The shim knobs are
/// cleared first so only `envs` apply.
pub fn run_child(test_name: &str, role: &str, envs: &[(&str, &str)]) -> ChildRun {
    let exe = std::env::current_exe().expect("test binary path");
    let mut cmd = Command::new(exe);
    cmd.args([test_name, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, role);
    for knob in KNOBS {
        cmd.env_remove(knob);
    }
    for (key, value) in envs {
        cmd.env(key, value);
    }
    let out = cmd.output().expect("spawn child test process");
    ChildRun {
        status: out.status,
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
    }
}
