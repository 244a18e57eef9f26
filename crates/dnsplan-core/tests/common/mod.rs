//! Record builders and helpers shared by the planner contract tests

#![allow(dead_code)]

use dnsplan_core::endpoint::{RECORD_TYPE_A, RECORD_TYPE_CNAME, RESOURCE_LABEL_KEY};
use dnsplan_core::{Changes, Endpoint, Plan};

/// An A record with a single target
pub fn a_record(name: &str, target: &str) -> Endpoint {
    Endpoint::new(name, RECORD_TYPE_A, [target])
}

/// An A record owned by `owner`
pub fn owned_a(name: &str, target: &str, owner: &str) -> Endpoint {
    a_record(name, target).with_owner(owner)
}

/// A CNAME record owned by `owner`
pub fn owned_cname(name: &str, target: &str, owner: &str) -> Endpoint {
    Endpoint::new(name, RECORD_TYPE_CNAME, [target]).with_owner(owner)
}

/// Tag a record with the resource that produced it
pub fn from_resource(record: Endpoint, resource: &str) -> Endpoint {
    record.with_label(RESOURCE_LABEL_KEY, resource)
}

/// Calculate and return the resulting changes
pub fn changes_of(plan: &Plan) -> Changes {
    plan.calculate()
        .changes
        .expect("calculated plan carries changes")
}

/// Apply changes to a record list the way a provider would
pub fn execute(current: &[Endpoint], changes: &Changes) -> Vec<Endpoint> {
    let mut next: Vec<Endpoint> = current
        .iter()
        .filter(|r| !changes.delete.contains(r) && !changes.update_old.contains(r))
        .cloned()
        .collect();
    next.extend(changes.update_new.iter().cloned());
    next.extend(changes.create.iter().cloned());
    next
}

/// Grouping identity of a record, mirroring the planner's normalization
pub fn key_of(record: &Endpoint) -> (String, String, String) {
    (
        dnsplan_core::plan::normalize_dns_name(&record.dns_name),
        record.set_identifier.clone(),
        record.record_type.clone(),
    )
}
