// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::new("git")
//!   .args() .cwd() .env() .timeout() .redact() .capture_output()
//!   .run() / .run_with_cancellation()
//!       --> tokio::process::Command (stdin = null, kill_on_drop)
//!           stream stdout/stderr
//!       --> ProcessOutput { exit_code, stdout, stderr }
//! ```

pub mod builder;
mod io;
mod runner;
