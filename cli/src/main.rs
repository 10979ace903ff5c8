// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Perimeter CLI Entry Point
//!
//! The binary entry point for Perimeter.
//!
//! This module bootstraps the application runtime and manages the global
//! lifecycle of the process, keeping the command-line layer isolated from
//! the evaluation core.
//!
//! ## Responsibilities
//!
//! 1.  **Runtime Initialization**: `#[tokio::main]` sets up the async
//!     runtime the collaborator calls (API fetches, webhook posts) run on.
//! 2.  **Global State Setup**: wires the `tracing` subscriber and the
//!     terminal output mode (verbosity, quiet levels, banner).
//! 3.  **Configuration Mapping**: converts parsed CLI flags into the
//!     internal `RunOptions` used throughout the workspace.
//! 4.  **Command Dispatch**: routes execution to the module in `commands/`.
//! 5.  **Error Boundary**: any error propagated out of a subcommand is
//!     logged with its phase context and turned into a non-zero exit code.

mod commands;
mod terminal;

use std::process::ExitCode;

use perimeter_common::{config::RunOptions, error};

use crate::{
    commands::{CommandLine, Commands, audit, config, exposure, policy},
    terminal::{print::Print, spinner},
};

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();
    spinner::init_logging(commands.verbosity);

    let opts = RunOptions::from(&commands);

    let _ = Print::init(&opts);
    Print::banner();

    let result = match &commands.command {
        Commands::Audit => audit::audit(&commands.config, &opts).await,
        Commands::Exposure => exposure::exposure(&commands.config, &opts).await,
        Commands::Policy => policy::policy(&commands.config, &opts).await,
        Commands::Config => config::show(&commands.config),
    };

    let exit_code = match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Critical failure: {e:#}");
            ExitCode::FAILURE
        }
    };

    Print::end_of_program();

    exit_code
}
