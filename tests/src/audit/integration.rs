// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

#![cfg(test)]

use perimeter_common::models::allow::AllowRule;
use perimeter_common::models::finding::FindingKind;
use perimeter_core::runner::Auditor;
use perimeter_core::sources::Inventory;

use crate::mocks::{
    FailingNotifier, MemoryExemptions, MemoryInventory, RecordingNotifier, floating_ip, group,
    port, project, world_open_tcp,
};

fn single_exposed_inventory() -> Inventory {
    Inventory {
        projects: vec![project("t1", "Alpha")],
        ports: vec![port("p-1", &["10.0.0.5"], &["sg-1"])],
        floating_ips: vec![floating_ip("f-1", Some("p-1"))],
        security_groups: vec![group("sg-1", "web", "t1", vec![world_open_tcp(22, 22)])],
    }
}

fn auditor<'a>(
    inventory: &'a MemoryInventory,
    exemptions: &'a MemoryExemptions,
    notifier: &'a dyn perimeter_core::sources::Notifier,
    allow_rules: Vec<AllowRule>,
    dry_run: bool,
) -> Auditor<'a> {
    Auditor {
        inventory,
        exemptions,
        notifier,
        allow_rules,
        prefix_message: "exposed groups:".to_string(),
        suffix_message: "please review".to_string(),
        dry_run,
    }
}

#[tokio::test]
async fn end_to_end_single_open_access_finding() {
    let inventory = MemoryInventory(single_exposed_inventory());
    let exemptions = MemoryExemptions(Vec::new());
    let notifier = RecordingNotifier::default();

    let outcome = auditor(&inventory, &exemptions, &notifier, Vec::new(), false)
        .run(&[])
        .await
        .unwrap();

    assert!(outcome.open_access.any_open);
    assert_eq!(outcome.open_access.findings.len(), 1);

    let finding = &outcome.open_access.findings[0];
    assert_eq!(finding.kind, FindingKind::OpenAccess);
    assert_eq!(finding.tenant, "Alpha");
    assert_eq!(finding.group_id, "sg-1");
    assert_eq!(finding.port_range(), Some("22-22"));

    let batches = notifier.delivered();
    assert_eq!(batches.len(), 1);
    let (prefix, findings, suffix) = &batches[0];
    assert_eq!(prefix, "exposed groups:");
    assert_eq!(findings.len(), 1);
    assert_eq!(suffix, "please review");
}

#[tokio::test]
async fn unexposed_group_is_silent() {
    let mut inv = single_exposed_inventory();
    inv.floating_ips.clear();

    let inventory = MemoryInventory(inv);
    let exemptions = MemoryExemptions(Vec::new());
    let notifier = RecordingNotifier::default();

    let outcome = auditor(&inventory, &exemptions, &notifier, Vec::new(), false)
        .run(&[])
        .await
        .unwrap();

    assert!(!outcome.open_access.any_open);
    assert!(notifier.delivered().is_empty());
}

#[tokio::test]
async fn allow_rule_resolved_by_tenant_name_suppresses_the_finding() {
    let inventory = MemoryInventory(single_exposed_inventory());
    let exemptions = MemoryExemptions(Vec::new());
    let notifier = RecordingNotifier::default();

    // Written the way an operator writes it: tenant by name, id blank
    // until the run resolves it.
    let allow = vec![AllowRule {
        tenant: "Alpha".to_string(),
        tenant_id: String::new(),
        group: "web".to_string(),
        ports: vec!["22-22".to_string()],
    }];

    let outcome = auditor(&inventory, &exemptions, &notifier, allow, false)
        .run(&[])
        .await
        .unwrap();

    assert!(!outcome.open_access.any_open);
    assert!(notifier.delivered().is_empty());
}

#[tokio::test]
async fn dynamic_exemption_suppresses_finding_and_notification() {
    let inventory = MemoryInventory(single_exposed_inventory());
    let exemptions = MemoryExemptions(vec!["sg-1".to_string()]);
    let notifier = RecordingNotifier::default();

    let outcome = auditor(&inventory, &exemptions, &notifier, Vec::new(), false)
        .run(&[])
        .await
        .unwrap();

    assert!(!outcome.open_access.any_open);
    assert!(notifier.delivered().is_empty());
}

#[tokio::test]
async fn dry_run_computes_findings_but_never_delivers() {
    let inventory = MemoryInventory(single_exposed_inventory());
    let exemptions = MemoryExemptions(Vec::new());
    let notifier = RecordingNotifier::default();

    let outcome = auditor(&inventory, &exemptions, &notifier, Vec::new(), true)
        .run(&[])
        .await
        .unwrap();

    assert!(outcome.open_access.any_open);
    assert_eq!(outcome.open_access.findings.len(), 1);
    assert!(notifier.delivered().is_empty());
}

#[tokio::test]
async fn repeated_runs_produce_identical_finding_sequences() {
    let inventory = MemoryInventory(Inventory {
        security_groups: vec![group(
            "sg-1",
            "web",
            "t1",
            vec![world_open_tcp(22, 22), world_open_tcp(80, 80)],
        )],
        ..single_exposed_inventory()
    });
    let exemptions = MemoryExemptions(Vec::new());
    let notifier = RecordingNotifier::default();
    let auditor = auditor(&inventory, &exemptions, &notifier, Vec::new(), true);

    let first = auditor.run(&[]).await.unwrap();
    let second = auditor.run(&[]).await.unwrap();

    assert_eq!(first.open_access.findings, second.open_access.findings);
    assert_eq!(first.open_access.findings.len(), 2);
}

#[tokio::test]
async fn unknown_tenant_falls_back_to_the_raw_id() {
    let mut inv = single_exposed_inventory();
    inv.projects.clear();

    let inventory = MemoryInventory(inv);
    let exemptions = MemoryExemptions(Vec::new());
    let notifier = RecordingNotifier::default();

    let outcome = auditor(&inventory, &exemptions, &notifier, Vec::new(), true)
        .run(&[])
        .await
        .unwrap();

    assert_eq!(outcome.open_access.findings[0].tenant, "t1");
}

#[tokio::test]
async fn delivery_failure_aborts_the_run() {
    let inventory = MemoryInventory(single_exposed_inventory());
    let exemptions = MemoryExemptions(Vec::new());
    let notifier = FailingNotifier;

    let err = auditor(&inventory, &exemptions, &notifier, Vec::new(), false)
        .run(&[])
        .await
        .unwrap_err();

    assert!(
        format!("{err:#}").contains("open-access"),
        "error should name the failing phase: {err:#}"
    );
}

#[tokio::test]
async fn unparseable_fixed_ip_fails_the_whole_run() {
    let mut inv = single_exposed_inventory();
    inv.floating_ips.clear();
    inv.ports[0].fixed_ips = vec!["bogus".to_string()];

    let inventory = MemoryInventory(inv);
    let exemptions = MemoryExemptions(Vec::new());
    let notifier = RecordingNotifier::default();

    let err = auditor(&inventory, &exemptions, &notifier, Vec::new(), false)
        .run(&[])
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("bogus"), "{err:#}");
}
