// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Static allow rules and the run-scoped dynamic exemption list.

use serde::Deserialize;

use crate::models::project::Project;

/// A configured exception to the open-access check.
///
/// Rule authors reference groups by tenant and group *name*; group names
/// are only unique within one tenant, so the tenant id is resolved once
/// per run and matching happens on `(tenant_id, group)`.
#[derive(Debug, Clone, Deserialize)]
pub struct AllowRule {
    /// Tenant name as written in configuration.
    pub tenant: String,
    /// Resolved from the project set at the start of a run.
    #[serde(skip)]
    pub tenant_id: String,
    pub group: String,
    /// Port entries: literals ("443") or exact ranges ("80-80").
    #[serde(default)]
    pub ports: Vec<String>,
}

/// Fills in `tenant_id` for every rule whose tenant name appears in the
/// project set. A name without a project stays unresolved and can never
/// match a group.
pub fn resolve_tenant_ids(rules: &mut [AllowRule], projects: &[Project]) {
    for rule in rules.iter_mut() {
        if let Some(project) = projects.iter().find(|p| p.name == rule.tenant) {
            rule.tenant_id = project.id.clone();
        }
    }
}

/// Ordered group ids temporarily exempted from notification, sourced
/// fresh once per run and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct ExemptionList(Vec<String>);

impl ExemptionList {
    pub fn new(ids: Vec<String>) -> Self {
        Self(ids)
    }

    pub fn contains(&self, group_id: &str) -> bool {
        self.0.iter().any(|id| id == group_id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }
}
