// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Shared wiring between the audit-style subcommands: configuration to
//! collaborators to a ready [`Auditor`].

use std::path::Path;

use anyhow::Context;
use perimeter_cloud::allowlist::{HttpExemptionSource, StaticExemptionSource};
use perimeter_cloud::auth::{self, AuthOptions, Session};
use perimeter_cloud::inventory::NeutronInventory;
use perimeter_cloud::notify::SlackNotifier;
use perimeter_common::config::{CheckerConfig, RunOptions};
use perimeter_common::info;
use perimeter_common::models::allow::ExemptionList;
use perimeter_core::runner::{Auditor, PolicyJob};
use perimeter_core::sources::ExemptionSource;

pub fn load_config(path: &Path) -> anyhow::Result<CheckerConfig> {
    CheckerConfig::load(path)
}

/// Compiles every `[[policy]]` definition into a ready engine. A policy
/// that fails to compile fails the run before anything is fetched.
pub fn policy_jobs(cfg: &CheckerConfig) -> anyhow::Result<Vec<PolicyJob>> {
    let mut jobs = Vec::with_capacity(cfg.policies.len());
    for def in &cfg.policies {
        let engine = perimeter_policy::loader::load_engine(&def.rules, def.data.as_deref())
            .with_context(|| format!("failed to load policy '{}'", def.name))?;
        info!(verbosity = 1, "Compiled policy '{}'", def.name);
        jobs.push(PolicyJob {
            name: def.name.clone(),
            prefix_message: def.prefix_message.clone(),
            suffix_message: def.suffix_message.clone(),
            engine: Box::new(engine),
        });
    }
    Ok(jobs)
}

async fn connect(cfg: &CheckerConfig) -> anyhow::Result<Session> {
    let opts = AuthOptions::from_config_env(&cfg.openstack)?;
    auth::authenticate(&opts, &cfg.openstack).await.context("failed to authenticate")
}

fn exemption_source(cfg: &CheckerConfig) -> Box<dyn ExemptionSource> {
    match cfg.exemptions.resolved_endpoint() {
        Some(endpoint) => Box::new(HttpExemptionSource::new(endpoint)),
        None => Box::new(StaticExemptionSource(ExemptionList::default())),
    }
}

/// The collaborators of one run, owned together so the auditor can
/// borrow them.
pub struct Wiring {
    pub inventory: NeutronInventory,
    pub exemptions: Box<dyn ExemptionSource>,
    pub notifier: SlackNotifier,
}

pub async fn wire(cfg: &CheckerConfig) -> anyhow::Result<Wiring> {
    let session = connect(cfg).await?;
    Ok(Wiring {
        inventory: NeutronInventory::new(session),
        exemptions: exemption_source(cfg),
        notifier: SlackNotifier::new(&cfg.slack),
    })
}

pub fn auditor<'a>(cfg: &CheckerConfig, opts: &RunOptions, wiring: &'a Wiring) -> Auditor<'a> {
    Auditor {
        inventory: &wiring.inventory,
        exemptions: wiring.exemptions.as_ref(),
        notifier: &wiring.notifier,
        allow_rules: cfg.allow_rules.clone(),
        prefix_message: cfg.prefix_message.clone(),
        suffix_message: cfg.suffix_message.clone(),
        dry_run: opts.dry_run || cfg.dry_run,
    }
}
