// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

/// A network port with its assigned addresses and attached security
/// groups. The relation to groups is many-to-many via
/// `security_group_ids`.
#[derive(Debug, Clone)]
pub struct Port {
    pub id: String,
    /// Addresses assigned to the port, in API order.
    pub fixed_ips: Vec<String>,
    pub security_group_ids: Vec<String>,
}

impl Port {
    pub fn carries_group(&self, group_id: &str) -> bool {
        self.security_group_ids.iter().any(|id| id == group_id)
    }
}

/// A public address bound (or bindable) to a port.
#[derive(Debug, Clone)]
pub struct FloatingIp {
    pub id: String,
    pub port_id: Option<String>,
}

impl FloatingIp {
    pub fn is_bound_to(&self, port_id: &str) -> bool {
        self.port_id.as_deref() == Some(port_id)
    }
}
