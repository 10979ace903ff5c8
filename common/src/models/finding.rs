// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Evaluation results and their display fields.
//!
//! Findings are appended in group-iteration order and never deduplicated;
//! identical inventory and allow sets therefore always produce identical
//! finding sequences.

use chrono::Local;

use crate::models::group::{IngressRule, SecurityGroup};

/// Which evaluator produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    OpenAccess,
    PolicyMatch,
}

/// One titled display value, rendered as a chat attachment field.
#[derive(Debug, Clone, PartialEq)]
pub struct FindingField {
    pub title: &'static str,
    pub value: String,
    pub short: bool,
}

impl FindingField {
    fn long(title: &'static str, value: String) -> Self {
        Self { title, value, short: false }
    }

    fn short(title: &'static str, value: String) -> Self {
        Self { title, value, short: true }
    }
}

/// A single reportable result.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub kind: FindingKind,
    /// Resolved tenant label, or the raw tenant id when resolution missed.
    pub tenant: String,
    pub group_id: String,
    pub group_name: String,
    pub fields: Vec<FindingField>,
}

impl Finding {
    /// A world-open ingress rule that survived both allow lists.
    pub fn open_access(group: &SecurityGroup, tenant: &str, rule: &IngressRule) -> Self {
        Self {
            kind: FindingKind::OpenAccess,
            tenant: tenant.to_string(),
            group_id: group.id.clone(),
            group_name: group.name.clone(),
            fields: vec![
                FindingField::long("Tenant", tenant.to_string()),
                FindingField::long("ID", group.id.clone()),
                FindingField::long("Name", group.name.clone()),
                FindingField::long("PortRange", rule.port_range_label()),
            ],
        }
    }

    /// A group the policy predicate answered true for. Carries the full
    /// per-rule dump and the localized creation timestamp.
    pub fn policy_match(group: &SecurityGroup, tenant: &str) -> Self {
        let rules_dump = group
            .rules
            .iter()
            .map(IngressRule::summary)
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            kind: FindingKind::PolicyMatch,
            tenant: tenant.to_string(),
            group_id: group.id.clone(),
            group_name: group.name.clone(),
            fields: vec![
                FindingField::long("Name", group.name.clone()),
                FindingField::short("Tenant", tenant.to_string()),
                FindingField::short("ID", group.id.clone()),
                FindingField::long("Created", group.created_at.with_timezone(&Local).to_string()),
                FindingField::long("Rules", rules_dump),
            ],
        }
    }

    /// The offending port range, present on open-access findings.
    pub fn port_range(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.title == "PortRange")
            .map(|f| f.value.as_str())
    }

    /// Config-ready exception entry for this finding, pasteable into the
    /// `[[allow]]` table of the configuration file.
    pub fn allow_snippet(&self) -> String {
        let mut out = String::from("[[allow]]\n");
        out.push_str(&format!("tenant = \"{}\"\n", self.tenant));
        out.push_str(&format!("group = \"{}\"\n", self.group_name));
        if let Some(range) = self.port_range() {
            out.push_str(&format!("ports = [\"{range}\"]\n"));
        }
        out
    }
}
