// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Address classification for the exposure filter.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::AuditError;

/// Decides whether an address belongs to the private side of the network.
///
/// Loopback, link-local unicast and link-local multicast all count as
/// private, as do the reserved blocks `10.0.0.0/8`, `172.16.0.0/12` and
/// `192.168.0.0/16`. Anything else is public.
///
/// An unparseable input is an error, never a verdict.
pub fn is_private(addr: &str) -> Result<bool, AuditError> {
    let ip: IpAddr = addr
        .trim()
        .parse()
        .map_err(|_| AuditError::InvalidAddress(addr.to_string()))?;

    Ok(match ip {
        IpAddr::V4(v4) => is_private_v4(&v4),
        IpAddr::V6(v6) => is_private_v6(&v6),
    })
}

fn is_private_v4(v4: &Ipv4Addr) -> bool {
    // is_private() covers exactly 10/8, 172.16/12 and 192.168/16.
    v4.is_loopback() || v4.is_link_local() || is_link_local_multicast_v4(v4) || v4.is_private()
}

fn is_private_v6(v6: &Ipv6Addr) -> bool {
    v6.is_loopback() || v6.is_unicast_link_local() || is_link_local_multicast_v6(v6)
}

/// 224.0.0.0/24, the IPv4 link-local multicast block.
fn is_link_local_multicast_v4(v4: &Ipv4Addr) -> bool {
    let [a, b, c, _] = v4.octets();
    a == 224 && b == 0 && c == 0
}

/// ff02::/16, link-local scope multicast.
fn is_link_local_multicast_v6(v6: &Ipv6Addr) -> bool {
    v6.segments()[0] & 0xff0f == 0xff02
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
