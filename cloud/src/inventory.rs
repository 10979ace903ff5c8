// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Paginated inventory fetching and wire-to-model mapping.
//!
//! Neutron pages carry `*_links` arrays with a `rel = "next"` entry while
//! more results remain; Keystone uses a `links.next` field. Either way
//! the pagination stays in here and the core receives complete sets.

use anyhow::{Context, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use perimeter_common::models::group::{Direction, IngressRule, SecurityGroup};
use perimeter_common::models::port::{FloatingIp, Port};
use perimeter_common::models::project::Project;
use perimeter_common::{debug, info};
use perimeter_core::sources::{Inventory, InventorySource};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::auth::Session;

/// Inventory source backed by the Neutron and Keystone APIs.
pub struct NeutronInventory {
    session: Session,
}

impl NeutronInventory {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> anyhow::Result<T> {
        debug!("GET {url}");
        let resp = self
            .session
            .http
            .get(url)
            .header("x-auth-token", &self.session.token)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        if !resp.status().is_success() {
            bail!("{url} answered with status {}", resp.status());
        }
        resp.json().await.with_context(|| format!("malformed response from {url}"))
    }

    async fn fetch_projects(&self) -> anyhow::Result<Vec<Project>> {
        let mut results = Vec::new();
        let mut url = format!("{}/projects", identity_base(&self.session.identity_url));
        loop {
            let page: ProjectsPage = self.get(&url).await?;
            results.extend(
                page.projects.into_iter().map(|p| Project { id: p.id, name: p.name }),
            );
            match page.links.and_then(|l| l.next) {
                Some(next) => url = next,
                None => break,
            }
        }
        Ok(results)
    }

    async fn fetch_ports(&self) -> anyhow::Result<Vec<Port>> {
        let mut results = Vec::new();
        let mut url = format!("{}/v2.0/ports", self.session.network_url);
        loop {
            let page: PortsPage = self.get(&url).await?;
            results.extend(page.ports.into_iter().map(|p| Port {
                id: p.id,
                fixed_ips: p.fixed_ips.into_iter().map(|f| f.ip_address).collect(),
                security_group_ids: p.security_groups,
            }));
            match next_link(&page.ports_links) {
                Some(next) => url = next,
                None => break,
            }
        }
        Ok(results)
    }

    async fn fetch_floating_ips(&self) -> anyhow::Result<Vec<FloatingIp>> {
        let mut results = Vec::new();
        let mut url = format!("{}/v2.0/floatingips", self.session.network_url);
        loop {
            let page: FloatingIpsPage = self.get(&url).await?;
            results.extend(
                page.floatingips
                    .into_iter()
                    .map(|f| FloatingIp { id: f.id, port_id: f.port_id }),
            );
            match next_link(&page.floatingips_links) {
                Some(next) => url = next,
                None => break,
            }
        }
        Ok(results)
    }

    async fn fetch_security_groups(&self) -> anyhow::Result<Vec<SecurityGroup>> {
        let mut results = Vec::new();
        let mut url = format!("{}/v2.0/security-groups", self.session.network_url);
        loop {
            let page: SecurityGroupsPage = self.get(&url).await?;
            for wire in page.security_groups {
                results.push(map_group(wire)?);
            }
            match next_link(&page.security_groups_links) {
                Some(next) => url = next,
                None => break,
            }
        }
        Ok(results)
    }
}

#[async_trait]
impl InventorySource for NeutronInventory {
    async fn snapshot(&self) -> anyhow::Result<Inventory> {
        let projects = self.fetch_projects().await.context("failed to fetch projects")?;
        let ports = self.fetch_ports().await.context("failed to fetch ports")?;
        let floating_ips =
            self.fetch_floating_ips().await.context("failed to fetch floating IPs")?;
        let security_groups =
            self.fetch_security_groups().await.context("failed to fetch security groups")?;

        info!(
            "Snapshot: {} projects, {} ports, {} floating IPs, {} security groups",
            projects.len(),
            ports.len(),
            floating_ips.len(),
            security_groups.len()
        );

        Ok(Inventory { projects, ports, floating_ips, security_groups })
    }
}

/// Keystone catalogs sometimes list the bare host, sometimes the /v3
/// root. Normalize to the versioned base.
fn identity_base(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    if trimmed.ends_with("/v3") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/v3")
    }
}

fn next_link(links: &[Link]) -> Option<String> {
    links.iter().find(|l| l.rel == "next").map(|l| l.href.clone())
}

fn map_group(wire: WireSecurityGroup) -> anyhow::Result<SecurityGroup> {
    let created_at = match &wire.created_at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("bad created_at '{raw}' on group {}", wire.id))?
            .with_timezone(&Utc),
        None => DateTime::<Utc>::UNIX_EPOCH,
    };

    Ok(SecurityGroup {
        id: wire.id,
        name: wire.name,
        tenant_id: wire.tenant_id,
        created_at,
        rules: wire.security_group_rules.into_iter().map(map_rule).collect(),
    })
}

fn map_rule(wire: WireRule) -> IngressRule {
    IngressRule {
        // Anything not explicitly egress counts as ingress; over-reporting
        // beats missing an exposure.
        direction: match wire.direction.as_str() {
            "egress" => Direction::Egress,
            _ => Direction::Ingress,
        },
        protocol: wire.protocol,
        remote_ip_prefix: wire.remote_ip_prefix,
        port_range_min: wire.port_range_min,
        port_range_max: wire.port_range_max,
    }
}

#[derive(Debug, Deserialize)]
struct Link {
    rel: String,
    href: String,
}

#[derive(Debug, Deserialize)]
struct ProjectsPage {
    projects: Vec<WireProject>,
    #[serde(default)]
    links: Option<IdentityLinks>,
}

#[derive(Debug, Deserialize)]
struct IdentityLinks {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireProject {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct PortsPage {
    ports: Vec<WirePort>,
    #[serde(default)]
    ports_links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct WirePort {
    id: String,
    #[serde(default)]
    fixed_ips: Vec<WireFixedIp>,
    #[serde(default)]
    security_groups: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WireFixedIp {
    ip_address: String,
}

#[derive(Debug, Deserialize)]
struct FloatingIpsPage {
    floatingips: Vec<WireFloatingIp>,
    #[serde(default)]
    floatingips_links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct WireFloatingIp {
    id: String,
    #[serde(default)]
    port_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SecurityGroupsPage {
    security_groups: Vec<WireSecurityGroup>,
    #[serde(default)]
    security_groups_links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct WireSecurityGroup {
    id: String,
    name: String,
    tenant_id: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    security_group_rules: Vec<WireRule>,
}

#[derive(Debug, Deserialize)]
struct WireRule {
    direction: String,
    #[serde(default)]
    protocol: Option<String>,
    #[serde(default)]
    remote_ip_prefix: Option<String>,
    #[serde(default)]
    port_range_min: Option<u16>,
    #[serde(default)]
    port_range_max: Option<u16>,
}
