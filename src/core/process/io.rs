// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks --> JoinHandle<String>
//!   wait | deadline | cancel
//!   join readers (bounded after a kill)
//!   --> (ProcessOutput { exit_code, stdout, stderr }, Ending)
//! ```
//!
//! Readers own their buffer and hand it back on join, so a chatty child
//! can never fill a channel nobody drains.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput, Redactor, StreamFlags};

/// Grace period for draining pipes after the child was killed.
///
/// Helpers spawned by the child (credential helpers, ssh) may keep the
/// pipes open after the child itself is gone.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// How the wait for the child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Ending {
    Exited,
    TimedOut,
    Interrupted,
}

struct StreamReader {
    flags: StreamFlags,
    process_name: String,
    stream_name: &'static str,
    redactor: Option<Redactor>,
}

impl StreamReader {
    fn spawn<R>(self, stream: Option<R>) -> Option<JoinHandle<String>>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        if !self
            .flags
            .intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING)
        {
            return None;
        }
        stream.map(|stream| tokio::spawn(self.read(stream)))
    }

    async fn read<R>(self, stream: R) -> String
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(stream);
        let mut collected = String::new();
        let mut raw = Vec::new();

        loop {
            raw.clear();
            match reader.read_until(b'\n', &mut raw).await {
                Ok(0) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&raw);
                    let line = text.trim_end_matches(['\n', '\r']);
                    let line = self.redactor.map_or_else(|| line.to_string(), |r| r(line));

                    if self.flags.contains(StreamFlags::FORWARD_TO_LOG) {
                        trace!(
                            process = %self.process_name,
                            stream = %self.stream_name,
                            line = %line,
                            "output"
                        );
                    }
                    if self.flags.contains(StreamFlags::KEEP_IN_STRING) {
                        if !collected.is_empty() {
                            collected.push('\n');
                        }
                        collected.push_str(&line);
                    }
                }
                Err(e) => {
                    warn!(
                        process = %self.process_name,
                        stream = %self.stream_name,
                        error = %e,
                        "error reading stream"
                    );
                    break;
                }
            }
        }

        collected
    }
}

/// Joins a reader; `grace` bounds the wait when the child was killed.
async fn join_reader(handle: Option<JoinHandle<String>>, grace: Option<Duration>) -> String {
    let Some(mut handle) = handle else {
        return String::new();
    };
    let joined = match grace {
        Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                debug!("output stream still open after kill, abandoning it");
                handle.abort();
                return String::new();
            }
        },
        None => handle.await,
    };
    joined.unwrap_or_default()
}

async fn sleep_or_forever(limit: Option<Duration>) {
    match limit {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending().await,
    }
}

async fn cancelled_or_forever(token: Option<&CancellationToken>) {
    match token {
        Some(t) => t.cancelled().await,
        None => std::future::pending().await,
    }
}

impl ProcessBuilder {
    /// Streams output, waits for the child and reports how the wait ended.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
        token: Option<&CancellationToken>,
    ) -> std::io::Result<(ProcessOutput, Ending)> {
        let stdout_flags = self.stdout_config();
        let stderr_flags = self.effective_stderr_flags();

        let stdout_handle = StreamReader {
            flags: stdout_flags,
            process_name: name.to_string(),
            stream_name: "stdout",
            redactor: self.redactor(),
        }
        .spawn(child.stdout.take());
        let stderr_handle = StreamReader {
            flags: stderr_flags,
            process_name: name.to_string(),
            stream_name: "stderr",
            redactor: self.redactor(),
        }
        .spawn(child.stderr.take());

        let timeout = self.timeout_duration();
        let (status, ending) = tokio::select! {
            status = child.wait() => (status?, Ending::Exited),
            () = sleep_or_forever(timeout) => {
                warn!(process = %name, timeout = ?timeout, "process timed out");
                child.kill().await.ok();
                (child.wait().await?, Ending::TimedOut)
            }
            () = cancelled_or_forever(token) => {
                warn!(process = %name, "cancellation requested, terminating process");
                child.kill().await.ok();
                (child.wait().await?, Ending::Interrupted)
            }
        };

        let grace = (ending != Ending::Exited).then_some(DRAIN_GRACE);
        let stdout = join_reader(stdout_handle, grace).await;
        let stderr = join_reader(stderr_handle, grace).await;

        Ok((
            ProcessOutput::new(status.code().unwrap_or(-1), stdout, stderr),
            ending,
        ))
    }
}
