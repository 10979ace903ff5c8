// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::path::Path;

use perimeter_common::success;

use crate::commands::support;
use crate::terminal::print::{self, Print};

/// Loads the configuration and compiles every policy, then prints a
/// resolved summary. Nothing is fetched and nothing is sent; this is the
/// pre-flight check for a new deployment.
pub fn show(config_path: &Path) -> anyhow::Result<()> {
    let cfg = support::load_config(config_path)?;
    let jobs = support::policy_jobs(&cfg)?;

    Print::header("configuration");
    print::aligned_line("Config", config_path.display().to_string());
    print::aligned_line("Auth URL", cfg.openstack.auth_url.clone());
    print::aligned_line("Region", cfg.openstack.region.clone());
    print::aligned_line("Channel", cfg.slack.channel.clone());
    print::aligned_line(
        "Exemptions",
        cfg.exemptions.resolved_endpoint().unwrap_or_else(|| "-".to_string()),
    );
    print::aligned_line("Allow rules", cfg.allow_rules.len().to_string());
    print::aligned_line("Dry run", cfg.dry_run.to_string());

    for job in &jobs {
        print::aligned_line("Policy", job.name.clone());
    }

    success!("Configuration OK: {} allow rules, {} policies", cfg.allow_rules.len(), jobs.len());
    Ok(())
}
