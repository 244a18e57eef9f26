//! Contract Test: Reference Reconciliation Scenarios
//!
//! Each test pins one end-to-end planner outcome.
//!
//! Constraints verified:
//! - Set-equal targets produce no change
//! - Colliding desired records produce exactly one create
//! - Records missing from the desired state are deleted
//! - Owner migration relabels records without touching their content
//! - Provider-specific properties are compared with the configured comparator

mod common;

use common::*;
use dnsplan_core::{BooleanPropertyComparator, Endpoint, Plan};
use std::sync::Arc;

#[test]
fn identical_record_is_a_no_op() {
    let current = vec![owned_a("foo.com.", "1.1.1.1", "me")];
    let desired = vec![a_record("foo.com.", "1.1.1.1")];

    let changes = changes_of(&Plan::new(current, desired).with_owner_id("me"));

    assert!(!changes.has_changes());
    assert!(changes.is_empty());
}

#[test]
fn target_order_does_not_matter() {
    let current = vec![Endpoint::new("foo.com.", "A", ["1.1.1.1", "2.2.2.2"]).with_owner("me")];
    let desired = vec![Endpoint::new("foo.com", "A", ["2.2.2.2", "1.1.1.1"])];

    let changes = changes_of(&Plan::new(current, desired).with_owner_id("me"));

    assert!(changes.is_empty());
}

#[test]
fn colliding_candidates_create_once() {
    let desired = vec![
        owned_a("bar.com.", "190.1.1.1", "me"),
        owned_a("bar.com.", "191.1.1.1", "me"),
    ];

    let changes = changes_of(&Plan::new(Vec::new(), desired.clone()).with_owner_id("me"));

    assert_eq!(changes.create.len(), 1);
    assert!(desired.contains(&changes.create[0]));
    assert!(changes.update_new.is_empty());
    assert!(changes.delete.is_empty());
}

#[test]
fn undesired_record_is_deleted() {
    let current = vec![owned_a("baz.com.", "1.2.3.4", "me")];

    let changes = changes_of(&Plan::new(current.clone(), Vec::new()).with_owner_id("me"));

    assert_eq!(changes.delete, current);
    assert!(changes.create.is_empty());
    assert!(changes.update_new.is_empty());
}

#[test]
fn previous_owner_records_are_migrated() {
    let current = vec![owned_a("qux.com.", "1.2.3.4", "old")];
    let desired = vec![a_record("qux.com.", "1.2.3.4")];

    let plan = Plan::new(current.clone(), desired)
        .with_owner_id("new")
        .with_owner_migration("old")
        .calculate();
    let changes = plan.changes.clone().unwrap();

    assert!(plan.has_migrated);
    assert_eq!(changes.update_old, current);
    assert_eq!(changes.update_new, vec![owned_a("qux.com.", "1.2.3.4", "new")]);
    assert!(changes.create.is_empty());
    assert!(changes.delete.is_empty());
}

#[test]
fn dropped_boolean_property_triggers_update() {
    let current = vec![owned_a("proxy.com.", "1.2.3.4", "me").with_provider_specific("proxied", "true")];
    let desired = vec![a_record("proxy.com.", "1.2.3.4")];

    let plan = Plan::new(current.clone(), desired)
        .with_owner_id("me")
        .with_property_comparator(Arc::new(BooleanPropertyComparator::new().with_property("proxied", false)));
    let changes = changes_of(&plan);

    assert_eq!(changes.update_old, current);
    assert_eq!(changes.update_new, vec![owned_a("proxy.com.", "1.2.3.4", "me")]);
}

#[test]
fn equivalent_boolean_property_is_a_no_op() {
    let current = vec![owned_a("proxy.com.", "1.2.3.4", "me").with_provider_specific("proxied", "false")];
    let desired = vec![a_record("proxy.com.", "1.2.3.4")];

    let plan = Plan::new(current, desired)
        .with_owner_id("me")
        .with_property_comparator(Arc::new(BooleanPropertyComparator::new().with_property("proxied", false)));

    assert!(changes_of(&plan).is_empty());
}

#[test]
fn ttl_changes_only_when_configured() {
    let current = vec![owned_a("ttl.com.", "1.2.3.4", "me").with_ttl(300)];

    let unconfigured = Plan::new(current.clone(), vec![a_record("ttl.com.", "1.2.3.4")]).with_owner_id("me");
    assert!(changes_of(&unconfigured).is_empty());

    let same = Plan::new(current.clone(), vec![a_record("ttl.com.", "1.2.3.4").with_ttl(300)]).with_owner_id("me");
    assert!(changes_of(&same).is_empty());

    let changed = Plan::new(current.clone(), vec![a_record("ttl.com.", "1.2.3.4").with_ttl(60)]).with_owner_id("me");
    let changes = changes_of(&changed);
    assert_eq!(changes.update_new, vec![owned_a("ttl.com.", "1.2.3.4", "me").with_ttl(60)]);
}

#[test]
fn calculated_plan_has_fixed_managed_records() {
    let plan = Plan::new(Vec::new(), Vec::new())
        .with_owner_id("me")
        .with_managed_records(["A", "TXT", "MX"])
        .calculate();

    assert_eq!(plan.managed_records, vec!["A", "AAAA", "CNAME"]);
    assert!(!plan.has_migrated);
}
