// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Push | Pull | Sync | Strategy | Targets | Status | Options | ConfigFiles
//! ```

use std::process::ExitCode;

use repo_sync::cli::global::GlobalOptions;
use repo_sync::cli::{self, Command};
use repo_sync::cmd::config::{run_config_files_command, run_options_command};
use repo_sync::cmd::status::run_status_command;
use repo_sync::cmd::sync::{run_kind_command, run_strategy_command, run_sync_command};
use repo_sync::cmd::targets::run_targets_command;
use repo_sync::config::loader::ConfigLoader;
use repo_sync::config::{Config, ENV_PREFIX, LOCAL_CONFIG_FILE};
use repo_sync::logging::{LogConfig, LogGuard, init_logging};
use repo_sync::sync::OperationKind;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    if matches!(cli.command, Some(Command::Version)) {
        handle_version_command();
        return ExitCode::SUCCESS;
    }

    let loader = match build_config_loader(&cli.global) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let loaded_files = loader.format_loaded_files();
    let config = match loader.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard: LogGuard = match init_logging(&build_log_config(&config)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config, &loaded_files).await
}

fn build_log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(config.global.log_file.clone())
        .with_file_format(config.global.log_format)
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: &Config, loaded_files: &[String]) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => {
            run_options_command(config);
            Ok(())
        }
        Some(Command::ConfigFiles) => {
            run_config_files_command(loaded_files);
            Ok(())
        }
        Some(Command::Push(args)) => run_kind_command(OperationKind::Push, args, config).await,
        Some(Command::Pull(args)) => run_kind_command(OperationKind::Pull, args, config).await,
        Some(Command::Sync(args)) => run_sync_command(args, config).await,
        Some(Command::Strategy(args)) => run_strategy_command(args, config).await,
        Some(Command::Targets(args)) => run_targets_command(args, config),
        Some(Command::Status) => run_status_command(config),
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> repo_sync::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(LOCAL_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);
    for option in global.to_config_overrides() {
        loader = loader.set_str(&option)?;
    }
    Ok(loader)
}
