// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! The policy evaluator: normalized facts in, verdicts out.
//!
//! The predicate engine never sees domain objects. Each group is
//! flattened into a plain JSON record; whatever mechanism sits behind
//! [`PolicyEngine`](crate::sources::PolicyEngine) only has to answer a
//! boolean over that record.

use perimeter_common::error::AuditError;
use perimeter_common::models::allow::ExemptionList;
use perimeter_common::models::finding::Finding;
use perimeter_common::models::group::SecurityGroup;
use perimeter_common::{finding, info};
use serde_json::{Value, json};

use crate::sources::{Inventory, PolicyEngine};
use crate::tenant;

/// Flattens a group into the fact record the predicate engine operates
/// on: every group field, with `created_at` replaced by a 64-bit count
/// of nanoseconds since epoch.
pub fn group_facts(group: &SecurityGroup) -> Result<Value, AuditError> {
    let mut facts = serde_json::to_value(group).map_err(|e| {
        AuditError::Evaluation(format!("cannot build fact record for {}: {e}", group.id))
    })?;
    facts["created_at"] = json!(group.created_at.timestamp_nanos_opt().unwrap_or_default());
    Ok(facts)
}

/// Queries `engine` once per non-exempt group, in inventory order. An
/// engine failure aborts the pass; a malformed policy must not produce
/// a partial report. A pass with zero matches is a valid outcome.
pub fn evaluate_policy(
    engine: &dyn PolicyEngine,
    inventory: &Inventory,
    exemptions: &ExemptionList,
) -> Result<Vec<Finding>, AuditError> {
    let mut findings = Vec::new();

    for group in &inventory.security_groups {
        if exemptions.contains(&group.id) {
            info!("Group {} is temporarily exempted, skipping policy checks", group.name);
            continue;
        }

        let facts = group_facts(group)?;
        if engine.evaluate(&facts)? {
            let label = tenant::tenant_label(&group.tenant_id, &inventory.projects);
            finding!("Group {} ({}) matches the policy", group.name, label);
            findings.push(Finding::policy_match(group, &label));
        }
    }

    Ok(findings)
}
