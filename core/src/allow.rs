// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Static exception matching.
//!
//! Matching is deliberately narrow. A `min-max` entry covers a rule only
//! on exact bounds equality: no overlap, no containment. Literal entries
//! cover a rule only when BOTH bounds appear as separate literals, so a
//! single-port entry never covers a same-numbered range. Downstream
//! configuration depends on these exact semantics.

use perimeter_common::models::allow::AllowRule;
use perimeter_common::models::group::{IngressRule, SecurityGroup};

/// Decides whether a configured exception covers `rule` on `group`.
/// Candidates are selected by exact `(tenant_id, group name)` equality;
/// the first matching entry wins, absence of a match is a plain false.
pub fn is_allowed(allow_rules: &[AllowRule], group: &SecurityGroup, rule: &IngressRule) -> bool {
    let (min, max) = rule.port_range();

    for allowed in allow_rules
        .iter()
        .filter(|a| a.tenant_id == group.tenant_id && a.group == group.name)
    {
        let range_match = allowed
            .ports
            .iter()
            .filter_map(|entry| parse_range_expr(entry))
            .any(|(lo, hi)| lo == min && hi == max);
        if range_match {
            return true;
        }

        if has_literal(&allowed.ports, min) && has_literal(&allowed.ports, max) {
            return true;
        }
    }

    false
}

/// Parses a `min-max` expression. Literals and malformed entries yield
/// None and simply never range-match.
fn parse_range_expr(entry: &str) -> Option<(u16, u16)> {
    let (lo, hi) = entry.split_once('-')?;
    Some((lo.trim().parse().ok()?, hi.trim().parse().ok()?))
}

fn has_literal(entries: &[String], port: u16) -> bool {
    entries.iter().any(|e| e.trim().parse::<u16>().is_ok_and(|p| p == port))
}
