// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Reachability filter: is anything attached to this group visible from
//! outside the private network?
//!
//! Checking exposure before rules keeps internal-only groups out of the
//! report no matter what they allow, and saves the rule and policy
//! machinery from looking at them at all.

use perimeter_common::error::AuditError;
use perimeter_common::models::group::SecurityGroup;
use perimeter_common::models::port::{FloatingIp, Port};
use perimeter_common::utils::ip;

/// A group is exposed iff some port carries its id AND that port either
/// has a floating IP bound or holds a fixed address that classifies as
/// public.
///
/// A fixed address that fails to classify aborts the whole check; a
/// half-evaluated group must never pass as "not exposed".
pub fn is_exposed(
    group: &SecurityGroup,
    ports: &[Port],
    floating_ips: &[FloatingIp],
) -> Result<bool, AuditError> {
    for port in ports.iter().filter(|p| p.carries_group(&group.id)) {
        if floating_ips.iter().any(|fip| fip.is_bound_to(&port.id)) {
            return Ok(true);
        }
        for addr in &port.fixed_ips {
            if !ip::is_private(addr)? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
