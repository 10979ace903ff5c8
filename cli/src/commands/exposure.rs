// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::path::Path;

use perimeter_common::config::RunOptions;
use perimeter_core::runner::AuditOutcome;

use crate::commands::support;
use crate::terminal::print::Print;
use crate::terminal::spinner::SpinnerGuard;

pub async fn exposure(config_path: &Path, opts: &RunOptions) -> anyhow::Result<()> {
    let cfg = support::load_config(config_path)?;
    let wiring = support::wire(&cfg).await?;
    let auditor = support::auditor(&cfg, opts, &wiring);

    Print::header("open access check");
    let open_access = {
        let _spinner = SpinnerGuard::phase("Checking internet exposure...");
        let prepared = auditor.prepare().await?;
        auditor.check_open_access(&prepared).await?
    };

    Print::outcome(&AuditOutcome { open_access, policy_findings: Vec::new() });
    Ok(())
}
