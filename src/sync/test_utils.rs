// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scripted command runner for unit tests.

use futures_util::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::runner::{CommandOutput, CommandRunner, Invocation};
use crate::error::ProcessError;

type Responder = Box<dyn Fn(&Invocation) -> Result<CommandOutput, ProcessError> + Send + Sync>;

struct Rule {
    args: Vec<String>,
    cwd: Option<PathBuf>,
    respond: Responder,
}

/// Records every invocation and answers from a list of rules.
///
/// The first rule whose argument run and working directory match wins;
/// unmatched invocations succeed with empty output.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<Invocation>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

pub(crate) fn non_zero_exit(inv: &Invocation, code: i32, stderr: &str) -> ProcessError {
    ProcessError::NonZeroExit {
        command: inv.command_line(),
        code,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Makes every call sleep first so concurrency can be observed.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn respond(
        &self,
        args: &[&str],
        cwd: Option<&Path>,
        respond: impl Fn(&Invocation) -> Result<CommandOutput, ProcessError> + Send + Sync + 'static,
    ) {
        self.rules.lock().unwrap().push(Rule {
            args: args.iter().map(ToString::to_string).collect(),
            cwd: cwd.map(Path::to_path_buf),
            respond: Box::new(respond),
        });
    }

    /// Scripts a non-zero exit for matching invocations.
    pub(crate) fn fail(&self, args: &[&str], cwd: Option<&Path>, code: i32, stderr: &'static str) {
        self.respond(args, cwd, move |inv| Err(non_zero_exit(inv, code, stderr)));
    }

    /// Reports staged changes so push runs its commit step.
    pub(crate) fn with_staged_changes(self, cwd: Option<&Path>) -> Self {
        self.fail(&["diff", "--cached", "--quiet"], cwd, 1, "");
        self
    }

    pub(crate) fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_in(&self, cwd: &Path) -> Vec<Invocation> {
        self.calls().into_iter().filter(|c| c.cwd == cwd).collect()
    }

    /// Argument vectors joined with spaces, in call order.
    pub(crate) fn arg_lines(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.args.join(" ")).collect()
    }

    pub(crate) fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn answer(&self, inv: &Invocation) -> Result<CommandOutput, ProcessError> {
        let rules = self.rules.lock().unwrap();
        let rule = rules.iter().find(|rule| {
            let args: Vec<&str> = rule.args.iter().map(String::as_str).collect();
            (args.is_empty() || inv.has_args(&args))
                && rule.cwd.as_ref().is_none_or(|cwd| *cwd == inv.cwd)
        });
        rule.map_or_else(|| Ok(CommandOutput::default()), |rule| (rule.respond)(inv))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run<'a>(
        &'a self,
        invocation: &'a Invocation,
    ) -> BoxFuture<'a, Result<CommandOutput, ProcessError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(invocation.clone());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let result = self.answer(invocation);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        })
    }
}
