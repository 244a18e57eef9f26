//! Record and ownership filters applied around change detection

use crate::endpoint::{DomainFilter, Endpoint};
use tracing::debug;

/// Keep the records the planner is responsible for
///
/// A record survives when its name matches the domain filter and its type is
/// one of `managed_records`. Input order is preserved.
pub fn filter_records_for_plan(
    records: &[Endpoint],
    domain_filter: &dyn DomainFilter,
    managed_records: &[String],
) -> Vec<Endpoint> {
    records
        .iter()
        .filter(|record| {
            if !domain_filter.matches(&record.dns_name) {
                debug!("Ignoring record {} that does not match domain filter", record.dns_name);
                return false;
            }
            is_managed_record(&record.record_type, managed_records)
        })
        .cloned()
        .collect()
}

/// Whether `record_type` is one of `managed_records`
pub fn is_managed_record(record_type: &str, managed_records: &[String]) -> bool {
    managed_records.iter().any(|r| r == record_type)
}

/// Keep the records owned by `owner_id`
///
/// While an owner migration is running, records owned by `owner_id_old`
/// are accepted as well. Records without an owner label never pass.
pub fn filter_owned_records(
    owner_id: &str,
    owner_id_old: Option<&str>,
    migrate: bool,
    records: Vec<Endpoint>,
) -> Vec<Endpoint> {
    let mut owner_ids = vec![owner_id];
    if migrate {
        owner_ids.extend(owner_id_old);
    }

    records
        .into_iter()
        .filter(|record| is_owned_by(record, &owner_ids))
        .collect()
}

/// Ownership filter for update pairs
///
/// A pair is kept only when both halves pass, so the old and new lists stay
/// aligned by index.
pub fn filter_owned_updates(
    owner_id: &str,
    owner_id_old: Option<&str>,
    migrate: bool,
    update_old: Vec<Endpoint>,
    update_new: Vec<Endpoint>,
) -> (Vec<Endpoint>, Vec<Endpoint>) {
    let mut owner_ids = vec![owner_id];
    if migrate {
        owner_ids.extend(owner_id_old);
    }

    update_old
        .into_iter()
        .zip(update_new)
        .filter(|(old, new)| is_owned_by(old, &owner_ids) && is_owned_by(new, &owner_ids))
        .unzip()
}

fn is_owned_by(record: &Endpoint, owner_ids: &[&str]) -> bool {
    match record.owner() {
        Some(owner) if owner_ids.contains(&owner) => true,
        found => {
            debug!(
                "Skipping endpoint {} because owner id does not match, found: {:?}, required: {:?}",
                record, found, owner_ids
            );
            false
        }
    }
}
