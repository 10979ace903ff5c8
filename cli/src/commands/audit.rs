// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::path::Path;

use perimeter_common::config::RunOptions;

use crate::commands::support;
use crate::terminal::print::Print;
use crate::terminal::spinner::SpinnerGuard;

pub async fn audit(config_path: &Path, opts: &RunOptions) -> anyhow::Result<()> {
    let cfg = support::load_config(config_path)?;
    let jobs = support::policy_jobs(&cfg)?;
    let wiring = support::wire(&cfg).await?;
    let auditor = support::auditor(&cfg, opts, &wiring);

    Print::header("full audit");
    let outcome = {
        let _spinner = SpinnerGuard::phase("Auditing security groups...");
        auditor.run(&jobs).await?
    };

    Print::outcome(&outcome);
    Ok(())
}
