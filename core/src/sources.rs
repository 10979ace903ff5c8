// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Capability seams between the evaluation core and its collaborators.
//!
//! The core consumes complete, typed snapshots; pagination, wire formats,
//! transport and credentials are the implementors' concern. All calls are
//! one-shot: no retry, no timeout semantics here.

use async_trait::async_trait;
use perimeter_common::error::AuditError;
use perimeter_common::models::allow::ExemptionList;
use perimeter_common::models::finding::Finding;
use perimeter_common::models::group::SecurityGroup;
use perimeter_common::models::port::{FloatingIp, Port};
use perimeter_common::models::project::Project;

/// Everything one evaluation pass looks at. Identifiers are stable
/// across the four sets within one snapshot.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub projects: Vec<Project>,
    pub ports: Vec<Port>,
    pub floating_ips: Vec<FloatingIp>,
    pub security_groups: Vec<SecurityGroup>,
}

#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Fetches the complete snapshot for this run.
    async fn snapshot(&self) -> anyhow::Result<Inventory>;
}

#[async_trait]
pub trait ExemptionSource: Send + Sync {
    /// Fetches the dynamic allow-list. An empty list is a valid answer
    /// and means "no exemptions".
    async fn fetch(&self) -> anyhow::Result<ExemptionList>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one ordered findings batch framed by prefix and suffix.
    /// A failure is fatal for the batch; the core never retries sends.
    async fn deliver(&self, findings: &[Finding], prefix: &str, suffix: &str)
    -> anyhow::Result<()>;
}

/// Boolean predicate over a group's normalized fact record.
pub trait PolicyEngine: Send + Sync {
    fn evaluate(&self, facts: &serde_json::Value) -> Result<bool, AuditError>;
}
