// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

#![cfg(test)]

use perimeter_common::models::finding::FindingKind;
use perimeter_core::runner::{Auditor, PolicyJob};
use perimeter_core::sources::Inventory;
use perimeter_policy::RulesetEngine;
use perimeter_policy::loader::{dataset_from_str, ruleset_from_str};
use perimeter_policy::schema::DataSet;

use crate::mocks::{
    MemoryExemptions, MemoryInventory, RecordingNotifier, floating_ip, group, port, project,
    world_open_tcp,
};

fn engine(rules: &str) -> RulesetEngine {
    RulesetEngine::new(ruleset_from_str(rules).unwrap(), DataSet::default()).unwrap()
}

fn engine_with_data(rules: &str, data: &str) -> RulesetEngine {
    RulesetEngine::new(ruleset_from_str(rules).unwrap(), dataset_from_str(data).unwrap()).unwrap()
}

fn job(name: &str, engine: RulesetEngine) -> PolicyJob {
    PolicyJob {
        name: name.to_string(),
        prefix_message: format!("{name} matches:"),
        suffix_message: "tighten or justify".to_string(),
        engine: Box::new(engine),
    }
}

fn inventory() -> Inventory {
    Inventory {
        projects: vec![project("t1", "Alpha")],
        ports: vec![port("p-1", &["10.0.0.5"], &["sg-1"])],
        floating_ips: vec![floating_ip("f-1", Some("p-1"))],
        security_groups: vec![
            group("sg-1", "default", "t1", vec![world_open_tcp(22, 22)]),
            group("sg-2", "web", "t1", Vec::new()),
        ],
    }
}

fn auditor<'a>(
    inventory: &'a MemoryInventory,
    exemptions: &'a MemoryExemptions,
    notifier: &'a RecordingNotifier,
) -> Auditor<'a> {
    Auditor {
        inventory,
        exemptions,
        notifier,
        allow_rules: Vec::new(),
        prefix_message: String::new(),
        suffix_message: String::new(),
        dry_run: false,
    }
}

const WORLD_OPEN_POLICY: &str = r#"
[[rule]]
type = "has_rule"
direction = "ingress"
remote_prefix = "0.0.0.0/0"
"#;

#[tokio::test]
async fn matching_group_yields_a_policy_finding_with_rule_dump() {
    let inv = MemoryInventory(inventory());
    let exemptions = MemoryExemptions(Vec::new());
    let notifier = RecordingNotifier::default();

    let jobs = vec![job("world-open", engine(WORLD_OPEN_POLICY))];
    let outcome = auditor(&inv, &exemptions, &notifier).run(&jobs).await.unwrap();

    assert_eq!(outcome.policy_findings.len(), 1);
    let (name, findings) = &outcome.policy_findings[0];
    assert_eq!(name, "world-open");
    assert_eq!(findings.len(), 1);

    let finding = &findings[0];
    assert_eq!(finding.kind, FindingKind::PolicyMatch);
    assert_eq!(finding.group_id, "sg-1");
    assert_eq!(finding.tenant, "Alpha");

    let rules_field = finding.fields.iter().find(|f| f.title == "Rules").unwrap();
    assert_eq!(rules_field.value, "ingress, IP Range: 0.0.0.0/0, Port Range: 22-22");
    assert!(finding.fields.iter().any(|f| f.title == "Created"));

    // One batch, framed by that policy's messages.
    let batches = notifier.delivered();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].0, "world-open matches:");
}

#[tokio::test]
async fn group_matching_two_policies_yields_one_finding_per_policy() {
    let inv = MemoryInventory(inventory());
    let exemptions = MemoryExemptions(Vec::new());
    let notifier = RecordingNotifier::default();

    let named_default = r#"
[[rule]]
type = "name_matches"
pattern = "^default$"
"#;
    let jobs = vec![
        job("world-open", engine(WORLD_OPEN_POLICY)),
        job("default-named", engine(named_default)),
    ];

    let outcome = auditor(&inv, &exemptions, &notifier).run(&jobs).await.unwrap();

    assert_eq!(outcome.policy_findings[0].1.len(), 1);
    assert_eq!(outcome.policy_findings[1].1.len(), 1);
    assert_eq!(notifier.delivered().len(), 2);
}

#[tokio::test]
async fn exempt_group_is_skipped_by_policy_passes() {
    let inv = MemoryInventory(inventory());
    let exemptions = MemoryExemptions(vec!["sg-1".to_string()]);
    let notifier = RecordingNotifier::default();

    let jobs = vec![job("world-open", engine(WORLD_OPEN_POLICY))];
    let outcome = auditor(&inv, &exemptions, &notifier).run(&jobs).await.unwrap();

    assert!(outcome.policy_findings[0].1.is_empty());
    // The open-access pass is also muted by the exemption, so nothing at
    // all goes out.
    assert!(notifier.delivered().is_empty());
}

#[tokio::test]
async fn dataset_backed_policy_flows_end_to_end() {
    let inv = MemoryInventory(inventory());
    let exemptions = MemoryExemptions(Vec::new());
    let notifier = RecordingNotifier::default();

    let rules = r#"
match = "all"

[[rule]]
type = "tenant_in"
list = "watched_tenants"

[[rule]]
type = "has_rule"
remote_prefix_in = "banned_prefixes"
"#;
    let data = r#"
[lists]
watched_tenants = ["t1"]
banned_prefixes = ["0.0.0.0/0", "::/0"]
"#;
    let jobs = vec![job("banned-prefixes", engine_with_data(rules, data))];

    let outcome = auditor(&inv, &exemptions, &notifier).run(&jobs).await.unwrap();
    assert_eq!(outcome.policy_findings[0].1.len(), 1);
    assert_eq!(outcome.policy_findings[0].1[0].group_id, "sg-1");
}

#[tokio::test]
async fn policy_with_no_matches_sends_nothing() {
    let inv = MemoryInventory(inventory());
    let exemptions = MemoryExemptions(Vec::new());
    let notifier = RecordingNotifier::default();

    let rules = r#"
[[rule]]
type = "name_matches"
pattern = "^no-such-group$"
"#;
    let jobs = vec![job("never-matches", engine(rules))];

    let outcome = auditor(&inv, &exemptions, &notifier).run(&jobs).await.unwrap();
    assert!(outcome.policy_findings[0].1.is_empty());

    // Only the open-access batch goes out (sg-1 is world-open and not
    // exempted here).
    let batches = notifier.delivered();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].1[0].kind, FindingKind::OpenAccess);
}
