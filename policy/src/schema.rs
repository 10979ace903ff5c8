// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Rule-set and data-set file shapes.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level rule source. `match` decides how the individual matcher
/// verdicts combine into the policy verdict.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSet {
    /// Schema version; currently must be "1".
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default, rename = "match")]
    pub combine: Combine,

    /// Matchers evaluated against every fact record.
    #[serde(default, rename = "rule")]
    pub rules: Vec<MatchRule>,
}

fn default_version() -> String {
    "1".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combine {
    /// Every matcher must hold (AND).
    #[default]
    All,
    /// Any matcher suffices (OR).
    Any,
}

/// A typed matcher over the fact record.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchRule {
    /// Some firewall rule on the group satisfies every given condition.
    /// Conditions left out are not checked.
    HasRule {
        #[serde(default)]
        direction: Option<String>,
        #[serde(default)]
        protocol: Option<String>,
        #[serde(default)]
        remote_prefix: Option<String>,
        /// Named data list the rule's remote prefix must appear in.
        #[serde(default)]
        remote_prefix_in: Option<String>,
        #[serde(default)]
        port_min: Option<u16>,
        #[serde(default)]
        port_max: Option<u16>,
    },

    /// Regex over the group name.
    NameMatches { pattern: String },

    /// Tenant-id membership in a named data list.
    TenantIn { list: String },

    /// Group age at engine construction time.
    OlderThanDays { days: i64 },
}

/// Optional data source: named string lists referenced by `*_in`
/// matchers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataSet {
    #[serde(default)]
    pub lists: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::{Combine, DataSet, MatchRule, RuleSet};

    #[test]
    fn parse_minimal_ruleset() {
        let ruleset: RuleSet = toml::from_str("").unwrap();
        assert_eq!(ruleset.version, "1");
        assert_eq!(ruleset.combine, Combine::All);
        assert!(ruleset.rules.is_empty());
    }

    #[test]
    fn parse_full_ruleset() {
        let toml = r#"
version = "1"
match = "any"

[[rule]]
type = "has_rule"
direction = "ingress"
remote_prefix = "0.0.0.0/0"
port_min = 22
port_max = 22

[[rule]]
type = "name_matches"
pattern = "^default$"

[[rule]]
type = "tenant_in"
list = "sandbox_tenants"

[[rule]]
type = "older_than_days"
days = 90
"#;
        let ruleset: RuleSet = toml::from_str(toml).unwrap();
        assert_eq!(ruleset.combine, Combine::Any);
        assert_eq!(ruleset.rules.len(), 4);

        match &ruleset.rules[0] {
            MatchRule::HasRule { direction, remote_prefix, port_min, protocol, .. } => {
                assert_eq!(direction.as_deref(), Some("ingress"));
                assert_eq!(remote_prefix.as_deref(), Some("0.0.0.0/0"));
                assert_eq!(*port_min, Some(22));
                assert!(protocol.is_none());
            }
            other => panic!("expected has_rule, got {other:?}"),
        }

        match &ruleset.rules[3] {
            MatchRule::OlderThanDays { days } => assert_eq!(*days, 90),
            other => panic!("expected older_than_days, got {other:?}"),
        }
    }

    #[test]
    fn parse_dataset_lists() {
        let toml = r#"
[lists]
sandbox_tenants = ["t-sandbox-1", "t-sandbox-2"]
banned_prefixes = ["0.0.0.0/0"]
"#;
        let data: DataSet = toml::from_str(toml).unwrap();
        assert_eq!(data.lists.len(), 2);
        assert_eq!(data.lists["sandbox_tenants"].len(), 2);
    }
}
