// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `options` and `config-files`: which configuration a run would use.

use crate::config::{Config, ENV_PREFIX};

/// Prints every effective option, one `key = value` per line.
pub fn run_options_command(config: &Config) {
    print_lines(&config.format_options(), "");
}

/// Prints the configuration files in load order.
pub fn run_config_files_command(loaded_files: &[String]) {
    let fallback =
        format!("No configuration files loaded; defaults and {ENV_PREFIX}_* variables apply");
    print_lines(loaded_files, &fallback);
}

fn print_lines(lines: &[String], when_empty: &str) {
    if lines.is_empty() {
        if !when_empty.is_empty() {
            println!("{when_empty}");
        }
        return;
    }
    for line in lines {
        println!("{line}");
    }
}
