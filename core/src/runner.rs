// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Run orchestration: collaborators in, findings and notifications out.
//!
//! One run is one lifecycle: fetch the dynamic allow-list, fetch the
//! inventory snapshot, resolve the configured exceptions against the
//! project set, evaluate, and deliver one notification batch per
//! violation category. Every collaborator failure aborts the remainder
//! of the run with context naming the phase; a half-evaluated posture
//! report is worse than none.

use anyhow::Context;
use perimeter_common::models::allow::{self, AllowRule, ExemptionList};
use perimeter_common::models::finding::Finding;
use perimeter_common::{info, success, warn};

use crate::audit::{self, OpenAccessReport};
use crate::policy;
use crate::sources::{ExemptionSource, Inventory, InventorySource, Notifier, PolicyEngine};

/// One named policy pass: a prepared engine plus its notification frame.
pub struct PolicyJob {
    pub name: String,
    pub prefix_message: String,
    pub suffix_message: String,
    pub engine: Box<dyn PolicyEngine>,
}

/// Everything a run needs, wired once by the caller.
pub struct Auditor<'a> {
    pub inventory: &'a dyn InventorySource,
    pub exemptions: &'a dyn ExemptionSource,
    pub notifier: &'a dyn Notifier,
    /// Static exceptions as configured; tenant ids are resolved during
    /// [`Auditor::prepare`].
    pub allow_rules: Vec<AllowRule>,
    pub prefix_message: String,
    pub suffix_message: String,
    pub dry_run: bool,
}

/// Snapshot state shared by the evaluators within one run.
pub struct PreparedRun {
    pub inventory: Inventory,
    pub exemptions: ExemptionList,
    pub allow_rules: Vec<AllowRule>,
}

/// What a completed run produced, for terminal rendering.
#[derive(Default, Debug)]
pub struct AuditOutcome {
    pub open_access: OpenAccessReport,
    pub policy_findings: Vec<(String, Vec<Finding>)>,
}

impl Auditor<'_> {
    /// Fetches and materializes everything the evaluators read.
    pub async fn prepare(&self) -> anyhow::Result<PreparedRun> {
        let exemptions = self
            .exemptions
            .fetch()
            .await
            .context("failed to fetch the exemption list")?;
        info!("Temporarily exempted security groups: {:?}", exemptions.ids());

        let inventory = self
            .inventory
            .snapshot()
            .await
            .context("failed to fetch the inventory snapshot")?;

        let mut allow_rules = self.allow_rules.clone();
        allow::resolve_tenant_ids(&mut allow_rules, &inventory.projects);

        Ok(PreparedRun { inventory, exemptions, allow_rules })
    }

    /// Open-access pass plus its single notification batch.
    pub async fn check_open_access(&self, run: &PreparedRun) -> anyhow::Result<OpenAccessReport> {
        info!("Looking for security groups open to the whole internet");
        let report =
            audit::evaluate_open_access(&run.inventory, &run.allow_rules, &run.exemptions)
                .context("open-access evaluation failed")?;

        if report.any_open {
            warn!("{} unrestricted ingress rule(s) found", report.findings.len());
            if self.dry_run {
                info!("Dry run, skipping notification");
            } else {
                self.notifier
                    .deliver(&report.findings, &self.prefix_message, &self.suffix_message)
                    .await
                    .context("failed to deliver the open-access warning")?;
            }
        } else {
            success!("No security group allows unrestricted access");
        }

        Ok(report)
    }

    /// Runs every policy job in order, one notification batch per policy
    /// that matched anything.
    pub async fn check_policies(
        &self,
        run: &PreparedRun,
        jobs: &[PolicyJob],
    ) -> anyhow::Result<Vec<(String, Vec<Finding>)>> {
        let mut results = Vec::with_capacity(jobs.len());

        for job in jobs {
            info!("Evaluating policy '{}'", job.name);
            let findings =
                policy::evaluate_policy(job.engine.as_ref(), &run.inventory, &run.exemptions)
                    .with_context(|| format!("policy '{}' failed to evaluate", job.name))?;

            if findings.is_empty() {
                success!("No security group matches policy '{}'", job.name);
            } else {
                warn!("{} group(s) match policy '{}'", findings.len(), job.name);
                if self.dry_run {
                    info!("Dry run, skipping notification");
                } else {
                    self.notifier
                        .deliver(&findings, &job.prefix_message, &job.suffix_message)
                        .await
                        .with_context(|| {
                            format!("failed to deliver the '{}' policy warning", job.name)
                        })?;
                }
            }
            results.push((job.name.clone(), findings));
        }

        Ok(results)
    }

    /// The full pass: prepare once, then both evaluators.
    pub async fn run(&self, jobs: &[PolicyJob]) -> anyhow::Result<AuditOutcome> {
        let prepared = self.prepare().await?;
        let open_access = self.check_open_access(&prepared).await?;
        let policy_findings = self.check_policies(&prepared, jobs).await?;
        Ok(AuditOutcome { open_access, policy_findings })
    }
}
