// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Push, pull, sync and strategy commands.
//!
//! ```text
//! load config + store
//!   ProcessRunner ----shares CancellationToken---- Orchestrator
//!        ^                                              |
//!   Ctrl+C --> token.cancel()                    TerminalNotifier
//!                                                       |
//!                                       spinner line + printed notices
//! report --> table or --json; any failure --> non-zero exit
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::cli::sync::{RunArgs, StrategyArgs};
use crate::config::Config;
use crate::error::Result;
use crate::orchestrator::events::{LogNotifier, NoticeSink};
use crate::orchestrator::{
    EventSink, Notice, NoticeLevel, Notifier, Orchestrator, RunReport, SyncEvent, TargetFilter,
};
use crate::sync::{Operation, OperationKind, ProcessRunner, SyncOperation, SyncOutcome};
use crate::target::TargetId;

/// Pre-validated spinner style for the current target line.
fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        })
        .clone()
}

/// Shows the latest "starting" notice on a spinner line and prints
/// terminal notices above it.
#[derive(Clone)]
pub struct TerminalNotifier {
    bar: ProgressBar,
}

impl TerminalNotifier {
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// Removes the spinner line.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn print(&self, line: &str) {
        if self.bar.is_hidden() {
            eprintln!("{line}");
        } else {
            self.bar.println(line);
        }
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: &Notice) {
        let mark = match notice.level {
            NoticeLevel::Info => '✓',
            NoticeLevel::Failure => '✗',
        };
        self.print(&format!("{mark} {}", notice.message));
    }
}

impl EventSink for TerminalNotifier {
    fn emit(&self, event: &SyncEvent) -> Result<()> {
        if event.is_terminal() {
            self.notify(&event.notice());
        } else {
            self.bar.set_message(event.notice().message);
        }
        Ok(())
    }
}

/// One line per outcome, prefixed by a summary.
#[must_use]
pub fn format_report(report: &RunReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: {} succeeded, {} failed",
        report.kind, report.succeeded, report.failed
    )];
    lines.extend(report.outcomes.iter().map(format_outcome));
    lines
}

fn format_outcome(outcome: &SyncOutcome) -> String {
    let state = match outcome.failure_kind() {
        None => "ok".to_string(),
        Some(kind) => format!("failed ({kind})"),
    };
    format!(
        "  {} {}: {state}: {}",
        outcome.target_id, outcome.target_name, outcome.detail
    )
}

/// Builds the filter for a run from `--target` and `--only`.
///
/// # Errors
///
/// Returns an error if an `--only` pattern is not a valid glob.
pub fn run_filter(args: &RunArgs) -> Result<TargetFilter> {
    TargetFilter::new(args.targets.clone(), args.only.clone())
}

struct Session {
    orchestrator: Orchestrator,
    terminal: Option<TerminalNotifier>,
}

impl Session {
    /// Wires runner, operation and orchestrator to one cancellation token
    /// that Ctrl+C fires.
    fn open(config: &Config, quiet: bool) -> Result<Self> {
        let (_, set) = super::load_targets(config)?;
        let cancel = CancellationToken::new();

        let runner = ProcessRunner::new(config.sync.stderr_policy).with_cancel_token(cancel.clone());
        let operation = SyncOperation::new(Arc::new(runner), config.sync.settings());
        let mut orchestrator = Orchestrator::new(set.into_shared(), operation)
            .with_max_concurrent(config.sync.max_concurrent)
            .with_cancel_token(cancel.clone());

        let terminal = if quiet {
            orchestrator = orchestrator.with_sink(Arc::new(NoticeSink::new(LogNotifier)));
            None
        } else {
            let terminal = TerminalNotifier::new();
            orchestrator = orchestrator.with_sink(Arc::new(terminal.clone()));
            Some(terminal)
        };

        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Received Ctrl+C, interrupting sync...");
                cancel.cancel();
            }
        });

        Ok(Self {
            orchestrator,
            terminal,
        })
    }

    fn close(&self) {
        if let Some(terminal) = &self.terminal {
            terminal.finish();
        }
    }
}

fn print_reports(reports: &[RunReport], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
    } else {
        for report in reports {
            for line in format_report(report) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn check_reports(reports: &[RunReport]) -> Result<()> {
    let failed: usize = reports.iter().map(|r| r.failed).sum();
    if failed > 0 {
        anyhow::bail!("{failed} target operation(s) failed");
    }
    Ok(())
}

/// A single `--target` without `--only` is a manual trigger for that target.
#[must_use]
pub fn manual_target(args: &RunArgs) -> Option<TargetId> {
    match args.targets.as_slice() {
        [id] if args.only.is_empty() => Some(*id),
        _ => None,
    }
}

/// Runs one direction over the enabled targets, or over the one target named
/// by a lone `--target` whatever its enable flags.
///
/// # Errors
///
/// Returns an error if setup fails, the target collection is unavailable,
/// a manually triggered target does not exist, or any target failed.
pub async fn run_kind_command(kind: OperationKind, args: &RunArgs, config: &Config) -> Result<()> {
    let filter = run_filter(args)?;
    let session = Session::open(config, args.json)?;
    let result = match manual_target(args) {
        Some(id) => session.orchestrator.trigger(kind, id).await,
        None => session.orchestrator.run_filtered(kind, &filter).await,
    };
    session.close();

    let reports = [result?];
    print_reports(&reports, args.json)?;
    check_reports(&reports)
}

/// Pushes, then pulls.
///
/// # Errors
///
/// See [`run_kind_command`].
pub async fn run_sync_command(args: &RunArgs, config: &Config) -> Result<()> {
    let filter = run_filter(args)?;
    let session = Session::open(config, args.json)?;
    let result = session.orchestrator.sync_all(&filter).await;
    session.close();

    let reports = result?;
    print_reports(&reports, args.json)?;
    check_reports(&reports)
}

/// Sets `pull.rebase` for one target, whatever its enable flags.
///
/// # Errors
///
/// Returns an error if the target does not exist or the setting failed.
pub async fn run_strategy_command(args: &StrategyArgs, config: &Config) -> Result<()> {
    let session = Session::open(config, false)?;
    let result = session
        .orchestrator
        .run_one(args.target, Operation::SetMergeStrategy(args.strategy))
        .await;
    session.close();

    let outcome = result?;
    println!("{}", format_outcome(&outcome).trim_start());
    if !outcome.is_success() {
        anyhow::bail!("setting the merge strategy of {} failed", args.target);
    }
    Ok(())
}
