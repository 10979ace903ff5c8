// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Security Group Model
//!
//! The typed boundary record for a security group and its firewall rules.
//!
//! ## Key Concepts
//! * **Snapshot**: a group is an immutable view from one inventory fetch;
//!   nothing here is mutated after construction.
//! * **Identity**: the group id string is the only identity that survives
//!   across runs; everything else is display data.
//! * **Boundary**: collaborators map their native API shapes into this
//!   record before anything in the evaluation core sees them.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The IPv4 "everyone" prefix.
pub const WORLD_PREFIX: &str = "0.0.0.0/0";

/// The whole usable port space, substituted when a rule carries no
/// port restriction.
pub const FULL_PORT_RANGE: (u16, u16) = (0, u16::MAX);

/// Traffic direction of a firewall rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ingress,
    Egress,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Ingress => write!(f, "ingress"),
            Direction::Egress => write!(f, "egress"),
        }
    }
}

/// A single firewall rule belonging to exactly one [`SecurityGroup`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngressRule {
    pub direction: Direction,
    pub protocol: Option<String>,
    /// CIDR the rule applies to; absent means the rule is not
    /// address-scoped.
    pub remote_ip_prefix: Option<String>,
    pub port_range_min: Option<u16>,
    pub port_range_max: Option<u16>,
}

impl IngressRule {
    /// Concrete inclusive bounds, with unrestricted rules widened to the
    /// full range.
    pub fn port_range(&self) -> (u16, u16) {
        match (self.port_range_min, self.port_range_max) {
            (Some(min), Some(max)) => (min, max),
            _ => FULL_PORT_RANGE,
        }
    }

    /// Renders the bounds the way rule authors write them: `min-max`.
    pub fn port_range_label(&self) -> String {
        let (min, max) = self.port_range();
        format!("{min}-{max}")
    }

    /// The only rule shape the open-access evaluator treats as a
    /// violation candidate: TCP, ingress, open to the world.
    pub fn is_world_open_tcp(&self) -> bool {
        self.direction == Direction::Ingress
            && self.protocol.as_deref() == Some("tcp")
            && self.remote_ip_prefix.as_deref() == Some(WORLD_PREFIX)
    }

    /// One-line rendering used in the per-rule dump of policy findings.
    pub fn summary(&self) -> String {
        format!(
            "{}, IP Range: {}, Port Range: {}",
            self.direction,
            self.remote_ip_prefix.as_deref().unwrap_or("-"),
            self.port_range_label()
        )
    }
}

/// A named set of firewall rules attachable to network ports.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityGroup {
    pub id: String,
    pub name: String,
    pub tenant_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "security_group_rules")]
    pub rules: Vec<IngressRule>,
}

#[cfg(test)]
mod tests {
    use super::{Direction, IngressRule};

    fn rule(min: Option<u16>, max: Option<u16>) -> IngressRule {
        IngressRule {
            direction: Direction::Ingress,
            protocol: Some("tcp".to_string()),
            remote_ip_prefix: Some("0.0.0.0/0".to_string()),
            port_range_min: min,
            port_range_max: max,
        }
    }

    #[test]
    fn bounded_rule_keeps_its_bounds() {
        assert_eq!(rule(Some(80), Some(443)).port_range(), (80, 443));
        assert_eq!(rule(Some(22), Some(22)).port_range_label(), "22-22");
    }

    #[test]
    fn unrestricted_rule_widens_to_full_range() {
        assert_eq!(rule(None, None).port_range(), (0, u16::MAX));
        assert_eq!(rule(None, None).port_range_label(), "0-65535");
    }

    #[test]
    fn world_open_requires_all_three_marks() {
        assert!(rule(Some(22), Some(22)).is_world_open_tcp());

        let mut udp = rule(Some(22), Some(22));
        udp.protocol = Some("udp".to_string());
        assert!(!udp.is_world_open_tcp());

        let mut egress = rule(Some(22), Some(22));
        egress.direction = Direction::Egress;
        assert!(!egress.is_world_open_tcp());

        let mut scoped = rule(Some(22), Some(22));
        scoped.remote_ip_prefix = Some("10.0.0.0/8".to_string());
        assert!(!scoped.is_world_open_tcp());

        let mut unscoped = rule(Some(22), Some(22));
        unscoped.remote_ip_prefix = None;
        assert!(!unscoped.is_world_open_tcp());
    }

    #[test]
    fn summary_reads_like_a_rule_dump_line() {
        assert_eq!(
            rule(Some(22), Some(22)).summary(),
            "ingress, IP Range: 0.0.0.0/0, Port Range: 22-22"
        );
    }
}
