// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! The open-access evaluator: one ordered, state-free pass over the
//! snapshot.

use perimeter_common::error::AuditError;
use perimeter_common::models::allow::{AllowRule, ExemptionList};
use perimeter_common::models::finding::Finding;
use perimeter_common::{debug, finding, info};

use crate::sources::Inventory;
use crate::{allow, exposure, tenant};

/// Outcome of one open-access pass.
#[derive(Debug, Clone, Default)]
pub struct OpenAccessReport {
    /// Findings in group-iteration order, one per surviving violation.
    pub findings: Vec<Finding>,
    /// Whether at least one finding was produced; the caller uses this
    /// to decide on notification.
    pub any_open: bool,
}

/// Flags every non-suppressed world-open TCP ingress rule on an exposed
/// group. Unexposed groups are skipped without touching their rules; a
/// group with several violating rules yields several findings.
pub fn evaluate_open_access(
    inventory: &Inventory,
    allow_rules: &[AllowRule],
    exemptions: &ExemptionList,
) -> Result<OpenAccessReport, AuditError> {
    let mut findings = Vec::new();

    for group in &inventory.security_groups {
        if !exposure::is_exposed(group, &inventory.ports, &inventory.floating_ips)? {
            continue;
        }

        for rule in group.rules.iter().filter(|r| r.is_world_open_tcp()) {
            if allow::is_allowed(allow_rules, group, rule) {
                debug!(
                    "Ports {} on group {} are covered by a configured exception",
                    rule.port_range_label(),
                    group.name
                );
                continue;
            }
            if exemptions.contains(&group.id) {
                info!("Group {} is temporarily exempted, muting the warning", group.name);
                continue;
            }

            let label = tenant::tenant_label(&group.tenant_id, &inventory.projects);
            finding!(
                "Group {} ({}) allows the whole internet on ports {}",
                group.name,
                label,
                rule.port_range_label()
            );
            findings.push(Finding::open_access(group, &label, rule));
        }
    }

    Ok(OpenAccessReport { any_open: !findings.is_empty(), findings })
}
