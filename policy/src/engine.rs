// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Compilation and evaluation of rule sets over fact records.
//!
//! Everything that can be wrong with a policy surfaces at construction:
//! bad regexes and dangling list references are load-time errors naming
//! the offending rule. Evaluation itself treats missing or ill-typed
//! fact fields as non-matches, the same way an undefined query answer
//! would read as false.

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use perimeter_common::error::AuditError;
use perimeter_core::sources::PolicyEngine;
use regex::Regex;
use serde_json::Value;
use tracing::trace;

use crate::schema::{Combine, DataSet, MatchRule, RuleSet};

/// Conditions of a `has_rule` matcher, list references resolved.
#[derive(Debug)]
struct RuleConditions {
    direction: Option<String>,
    protocol: Option<String>,
    remote_prefix: Option<String>,
    remote_prefix_list: Option<Vec<String>>,
    port_min: Option<u16>,
    port_max: Option<u16>,
}

/// A matcher with its patterns compiled and list references resolved.
#[derive(Debug)]
enum CompiledRule {
    HasRule(RuleConditions),
    NameMatches { regex: Regex },
    TenantIn { ids: Vec<String> },
    CreatedBefore { cutoff_nanos: i64 },
}

/// The embedded predicate engine. Constructed once per policy, queried
/// once per non-exempt group.
#[derive(Debug)]
pub struct RulesetEngine {
    combine: Combine,
    compiled: Vec<CompiledRule>,
}

impl RulesetEngine {
    /// Compiles every matcher eagerly. Age cutoffs are fixed at
    /// construction so one run evaluates every group against the same
    /// instant.
    pub fn new(ruleset: RuleSet, dataset: DataSet) -> anyhow::Result<Self> {
        let now = Utc::now();
        let mut compiled = Vec::with_capacity(ruleset.rules.len());
        for (idx, rule) in ruleset.rules.iter().enumerate() {
            let compiled_rule = compile_rule(rule, &dataset, now)
                .with_context(|| format!("failed to compile rule #{idx}"))?;
            compiled.push(compiled_rule);
        }
        Ok(Self { combine: ruleset.combine, compiled })
    }
}

impl PolicyEngine for RulesetEngine {
    fn evaluate(&self, facts: &Value) -> Result<bool, AuditError> {
        if !facts.is_object() {
            return Err(AuditError::Evaluation("fact record is not an object".to_string()));
        }
        // An empty rule set matches nothing, regardless of combine mode.
        if self.compiled.is_empty() {
            return Ok(false);
        }

        let verdict = match self.combine {
            Combine::All => self.compiled.iter().all(|rule| rule_matches(rule, facts)),
            Combine::Any => self.compiled.iter().any(|rule| rule_matches(rule, facts)),
        };
        trace!(verdict, "evaluated fact record");
        Ok(verdict)
    }
}

fn rule_matches(rule: &CompiledRule, facts: &Value) -> bool {
    match rule {
        CompiledRule::NameMatches { regex } => facts
            .get("name")
            .and_then(Value::as_str)
            .is_some_and(|name| regex.is_match(name)),

        CompiledRule::TenantIn { ids } => facts
            .get("tenant_id")
            .and_then(Value::as_str)
            .is_some_and(|id| ids.iter().any(|x| x == id)),

        CompiledRule::CreatedBefore { cutoff_nanos } => facts
            .get("created_at")
            .and_then(Value::as_i64)
            .is_some_and(|nanos| nanos < *cutoff_nanos),

        CompiledRule::HasRule(conditions) => facts
            .get("security_group_rules")
            .and_then(Value::as_array)
            .is_some_and(|rules| rules.iter().any(|r| conditions_hold(conditions, r))),
    }
}

fn conditions_hold(cond: &RuleConditions, rule: &Value) -> bool {
    let str_field = |key: &str| rule.get(key).and_then(Value::as_str);
    let port_field = |key: &str| rule.get(key).and_then(Value::as_u64);

    if let Some(want) = &cond.direction
        && str_field("direction") != Some(want.as_str())
    {
        return false;
    }
    if let Some(want) = &cond.protocol
        && str_field("protocol") != Some(want.as_str())
    {
        return false;
    }
    if let Some(want) = &cond.remote_prefix
        && str_field("remote_ip_prefix") != Some(want.as_str())
    {
        return false;
    }
    if let Some(list) = &cond.remote_prefix_list
        && !str_field("remote_ip_prefix").is_some_and(|p| list.iter().any(|x| x == p))
    {
        return false;
    }
    if let Some(want) = cond.port_min
        && port_field("port_range_min") != Some(u64::from(want))
    {
        return false;
    }
    if let Some(want) = cond.port_max
        && port_field("port_range_max") != Some(u64::from(want))
    {
        return false;
    }
    true
}

fn compile_rule(
    rule: &MatchRule,
    dataset: &DataSet,
    now: DateTime<Utc>,
) -> anyhow::Result<CompiledRule> {
    match rule {
        MatchRule::NameMatches { pattern } => {
            let regex = Regex::new(pattern)
                .with_context(|| format!("invalid name pattern: {pattern}"))?;
            Ok(CompiledRule::NameMatches { regex })
        }
        MatchRule::TenantIn { list } => {
            Ok(CompiledRule::TenantIn { ids: named_list(dataset, list)? })
        }
        MatchRule::OlderThanDays { days } => {
            let cutoff = now - Duration::days(*days);
            Ok(CompiledRule::CreatedBefore {
                cutoff_nanos: cutoff.timestamp_nanos_opt().unwrap_or(i64::MIN),
            })
        }
        MatchRule::HasRule {
            direction,
            protocol,
            remote_prefix,
            remote_prefix_in,
            port_min,
            port_max,
        } => {
            let remote_prefix_list = match remote_prefix_in {
                Some(list) => Some(named_list(dataset, list)?),
                None => None,
            };
            Ok(CompiledRule::HasRule(RuleConditions {
                direction: direction.clone(),
                protocol: protocol.clone(),
                remote_prefix: remote_prefix.clone(),
                remote_prefix_list,
                port_min: *port_min,
                port_max: *port_max,
            }))
        }
    }
}

fn named_list(dataset: &DataSet, name: &str) -> anyhow::Result<Vec<String>> {
    dataset
        .lists
        .get(name)
        .cloned()
        .with_context(|| format!("rule references unknown data list '{name}'"))
}
