// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Command Line Interface Definitions
//!
//! The single source of truth for user input. Execution logic lives in
//! the per-command submodules; the argument schema, flags and help text
//! are centralized here. The `From<&CommandLine> for RunOptions`
//! implementation keeps the core libraries agnostic of the interface
//! layer.

pub mod audit;
pub mod config;
pub mod exposure;
pub mod policy;
mod support;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use perimeter_common::config::RunOptions;

#[derive(Parser)]
#[command(name = "perimeter")]
#[command(about = "Security group exposure and policy auditor.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the checker configuration file
    #[arg(short = 'c', long = "config", default_value = "perimeter.toml", global = true)]
    pub config: PathBuf,

    /// Compute findings but skip all notification delivery
    #[arg(long = "dry-run", global = true)]
    pub dry_run: bool,

    /// Keep logs and colors but hide the ASCII art
    #[arg(long = "no-banner", global = true)]
    pub no_banner: bool,

    /// Reduce UI visual density (-q: reduce styling, -qq: raw findings)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Increase logging detail (-v: debug logs, -vv: wire traces)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full pass: open-access check plus every configured policy
    #[command(alias = "a")]
    Audit,

    /// Open-access check only
    #[command(alias = "e")]
    Exposure,

    /// Configured policy checks only
    #[command(alias = "p")]
    Policy,

    /// Validate the configuration and compiled policies
    #[command(alias = "c")]
    Config,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl From<&CommandLine> for RunOptions {
    fn from(cmd: &CommandLine) -> Self {
        Self {
            no_banner: cmd.no_banner,
            dry_run: cmd.dry_run,
            quiet: cmd.quiet,
        }
    }
}
