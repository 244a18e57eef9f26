//! Contract Test: Change Detection
//!
//! Constraints verified:
//! - Every grouping key yields at most one action
//! - update_old[i] and update_new[i] always describe the same key
//! - Policies run in order, before ownership filtering
//! - The conflict resolver is injectable
//! - Output is deterministic for a fixed input

mod common;

use common::*;
use dnsplan_core::endpoint::RECORD_TYPE_AAAA;
use dnsplan_core::{
    Changes, ConflictResolver, CreateOnlyPolicy, Endpoint, Plan, Policy, UpsertOnlyPolicy,
};
use std::collections::HashSet;
use std::sync::Arc;

fn mixed_plan() -> Plan {
    let current = vec![
        owned_a("keep.com", "1.1.1.1", "me"),
        owned_a("change.com", "1.1.1.1", "me"),
        owned_a("drop.com", "1.1.1.1", "me"),
        owned_a("weighted.com", "1.1.1.1", "me").with_set_identifier("eu"),
        owned_cname("alias.com", "lb.example.com", "me"),
    ];
    let desired = vec![
        owned_a("keep.com", "1.1.1.1", "me"),
        owned_a("change.com", "2.2.2.2", "me"),
        owned_a("new.com", "3.3.3.3", "me"),
        owned_a("weighted.com", "1.1.1.1", "me").with_set_identifier("eu"),
        owned_a("weighted.com", "4.4.4.4", "me").with_set_identifier("us"),
        owned_cname("alias.com", "LB.example.com.", "me").with_ttl(120),
    ];
    Plan::new(current, desired).with_owner_id("me")
}

#[test]
fn each_key_gets_at_most_one_action() {
    let changes = changes_of(&mixed_plan());

    let mut seen = HashSet::new();
    for record in changes.create.iter().chain(&changes.update_new).chain(&changes.delete) {
        assert!(seen.insert(key_of(record)), "key {:?} has more than one action", key_of(record));
    }

    let created: Vec<&str> = changes.create.iter().map(|r| r.dns_name.as_str()).collect();
    let updated: Vec<&str> = changes.update_new.iter().map(|r| r.dns_name.as_str()).collect();
    let deleted: Vec<&str> = changes.delete.iter().map(|r| r.dns_name.as_str()).collect();

    assert_eq!(created, vec!["new.com", "weighted.com"]);
    assert_eq!(updated, vec!["alias.com", "change.com"]);
    assert_eq!(deleted, vec!["drop.com"]);
    assert_eq!(changes.create[1].set_identifier, "us");
}

#[test]
fn update_pairs_share_a_key() {
    let changes = changes_of(&mixed_plan());

    assert_eq!(changes.update_old.len(), changes.update_new.len());
    for (old, new) in changes.update_old.iter().zip(&changes.update_new) {
        assert_eq!(key_of(old), key_of(new));
    }
}

#[test]
fn record_types_do_not_collide() {
    let current = vec![owned_a("dual.com", "1.1.1.1", "me")];
    let desired = vec![
        owned_a("dual.com", "1.1.1.1", "me"),
        Endpoint::new("dual.com", RECORD_TYPE_AAAA, ["2001:db8::1"]).with_owner("me"),
    ];

    let changes = changes_of(&Plan::new(current, desired).with_owner_id("me"));

    assert_eq!(changes.create.len(), 1);
    assert_eq!(changes.create[0].record_type, RECORD_TYPE_AAAA);
    assert!(changes.update_new.is_empty());
}

#[test]
fn unmanaged_types_are_ignored() {
    let current = vec![Endpoint::new("mx.com", "MX", ["10 mail.mx.com"]).with_owner("me")];

    let changes = changes_of(&Plan::new(current, Vec::new()).with_owner_id("me"));

    assert!(changes.is_empty());
}

#[test]
fn upsert_only_policy_keeps_records() {
    let changes = changes_of(&mixed_plan().with_policy(Arc::new(UpsertOnlyPolicy)));

    assert!(changes.delete.is_empty());
    assert_eq!(changes.create.len(), 2);
    assert_eq!(changes.update_new.len(), 2);
}

#[test]
fn policies_run_in_order() {
    struct Recorder(&'static str, Arc<std::sync::Mutex<Vec<&'static str>>>);

    impl Policy for Recorder {
        fn apply(&self, changes: Changes) -> Changes {
            self.1.lock().unwrap().push(self.0);
            changes
        }

        fn policy_name(&self) -> &'static str {
            self.0
        }
    }

    let calls = Arc::new(std::sync::Mutex::new(Vec::new()));
    let plan = mixed_plan()
        .with_policy(Arc::new(Recorder("first", calls.clone())))
        .with_policy(Arc::new(CreateOnlyPolicy))
        .with_policy(Arc::new(Recorder("last", calls.clone())));

    let changes = changes_of(&plan);

    assert_eq!(*calls.lock().unwrap(), vec!["first", "last"]);
    assert_eq!(changes.create.len(), 2);
    assert!(changes.update_new.is_empty());
    assert!(changes.delete.is_empty());
}

#[test]
fn policy_output_is_ownership_filtered() {
    struct Hijack;

    impl Policy for Hijack {
        fn apply(&self, mut changes: Changes) -> Changes {
            changes.delete.push(owned_a("victim.com", "1.1.1.1", "them"));
            changes
        }

        fn policy_name(&self) -> &'static str {
            "hijack"
        }
    }

    let changes = changes_of(&mixed_plan().with_policy(Arc::new(Hijack)));

    assert!(changes.delete.iter().all(|r| r.owner() == Some("me")));
}

#[test]
fn resolver_is_injectable() {
    struct LastWins;

    impl ConflictResolver for LastWins {
        fn resolve_create(&self, candidates: &[Endpoint]) -> Endpoint {
            candidates[candidates.len() - 1].clone()
        }

        fn resolve_update(&self, _current: &Endpoint, candidates: &[Endpoint]) -> Endpoint {
            self.resolve_create(candidates)
        }

        fn resolver_name(&self) -> &'static str {
            "last-wins"
        }
    }

    let desired = vec![owned_a("bar.com", "190.1.1.1", "me"), owned_a("bar.com", "191.1.1.1", "me")];

    let default = changes_of(&Plan::new(Vec::new(), desired.clone()).with_owner_id("me"));
    let injected = changes_of(
        &Plan::new(Vec::new(), desired.clone())
            .with_owner_id("me")
            .with_resolver(Arc::new(LastWins)),
    );

    assert_eq!(default.create, vec![desired[0].clone()]);
    assert_eq!(injected.create, vec![desired[1].clone()]);
}

#[test]
fn output_is_deterministic() {
    let plan = mixed_plan();

    let first = changes_of(&plan);
    let second = changes_of(&plan);

    let mut reversed = mixed_plan();
    reversed.current.reverse();
    reversed.desired.reverse();
    let third = changes_of(&reversed);

    assert_eq!(first, second);
    assert_eq!(first, third);
}

#[test]
fn duplicate_current_records_keep_the_last() {
    let current = vec![owned_a("dup.com", "1.1.1.1", "me"), owned_a("dup.com", "2.2.2.2", "me")];

    let changes = changes_of(&Plan::new(current, Vec::new()).with_owner_id("me"));

    assert_eq!(changes.delete, vec![owned_a("dup.com", "2.2.2.2", "me")]);
}

#[test]
fn held_key_follows_its_resource() {
    let current = vec![from_resource(owned_a("svc.com", "1.1.1.1", "me"), "ingress/a")];
    let desired = vec![
        from_resource(owned_a("svc.com", "1.1.1.1", "me"), "ingress/b"),
        from_resource(owned_a("svc.com", "2.2.2.2", "me"), "ingress/a"),
    ];

    let changes = changes_of(&Plan::new(current.clone(), desired.clone()).with_owner_id("me"));

    assert_eq!(changes.update_old, current);
    assert_eq!(changes.update_new, vec![desired[1].clone()]);
}
