// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! In-memory collaborators and inventory builders for end-to-end
//! evaluation tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use perimeter_common::models::allow::ExemptionList;
use perimeter_common::models::finding::Finding;
use perimeter_common::models::group::{Direction, IngressRule, SecurityGroup};
use perimeter_common::models::port::{FloatingIp, Port};
use perimeter_common::models::project::Project;
use perimeter_core::sources::{ExemptionSource, Inventory, InventorySource, Notifier};

pub struct MemoryInventory(pub Inventory);

#[async_trait]
impl InventorySource for MemoryInventory {
    async fn snapshot(&self) -> anyhow::Result<Inventory> {
        Ok(self.0.clone())
    }
}

pub struct MemoryExemptions(pub Vec<String>);

#[async_trait]
impl ExemptionSource for MemoryExemptions {
    async fn fetch(&self) -> anyhow::Result<ExemptionList> {
        Ok(ExemptionList::new(self.0.clone()))
    }
}

/// One recorded batch: prefix, the findings as delivered, suffix.
pub type Batch = (String, Vec<Finding>, String);

/// Records every delivered batch instead of sending anything.
#[derive(Default)]
pub struct RecordingNotifier {
    pub batches: Mutex<Vec<Batch>>,
}

impl RecordingNotifier {
    pub fn delivered(&self) -> Vec<Batch> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, findings: &[Finding], prefix: &str, suffix: &str) -> anyhow::Result<()> {
        self.batches
            .lock()
            .unwrap()
            .push((prefix.to_string(), findings.to_vec(), suffix.to_string()));
        Ok(())
    }
}

/// Fails every delivery, for fail-fast assertions.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn deliver(
        &self,
        _findings: &[Finding],
        _prefix: &str,
        _suffix: &str,
    ) -> anyhow::Result<()> {
        anyhow::bail!("delivery unavailable")
    }
}

pub fn created() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

pub fn world_open_tcp(min: u16, max: u16) -> IngressRule {
    IngressRule {
        direction: Direction::Ingress,
        protocol: Some("tcp".to_string()),
        remote_ip_prefix: Some("0.0.0.0/0".to_string()),
        port_range_min: Some(min),
        port_range_max: Some(max),
    }
}

pub fn group(id: &str, name: &str, tenant_id: &str, rules: Vec<IngressRule>) -> SecurityGroup {
    SecurityGroup {
        id: id.to_string(),
        name: name.to_string(),
        tenant_id: tenant_id.to_string(),
        created_at: created(),
        rules,
    }
}

pub fn port(id: &str, fixed_ips: &[&str], group_ids: &[&str]) -> Port {
    Port {
        id: id.to_string(),
        fixed_ips: fixed_ips.iter().map(|s| s.to_string()).collect(),
        security_group_ids: group_ids.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn floating_ip(id: &str, port_id: Option<&str>) -> FloatingIp {
    FloatingIp {
        id: id.to_string(),
        port_id: port_id.map(|s| s.to_string()),
    }
}

pub fn project(id: &str, name: &str) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
    }
}
