// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::path::Path;

use anyhow::bail;
use perimeter_common::config::RunOptions;
use perimeter_core::runner::AuditOutcome;

use crate::commands::support;
use crate::terminal::print::Print;
use crate::terminal::spinner::SpinnerGuard;

pub async fn policy(config_path: &Path, opts: &RunOptions) -> anyhow::Result<()> {
    let cfg = support::load_config(config_path)?;
    let jobs = support::policy_jobs(&cfg)?;
    if jobs.is_empty() {
        bail!("no [[policy]] definitions in {}", config_path.display());
    }

    let wiring = support::wire(&cfg).await?;
    let auditor = support::auditor(&cfg, opts, &wiring);

    Print::header("policy checks");
    let policy_findings = {
        let _spinner = SpinnerGuard::phase("Evaluating policies...");
        let prepared = auditor.prepare().await?;
        auditor.check_policies(&prepared, &jobs).await?
    };

    Print::outcome(&AuditOutcome { open_access: Default::default(), policy_findings });
    Ok(())
}
