//! Reconciliation planner
//!
//! A [`Plan`] turns a list of current records and a list of desired records
//! into the [`Changes`] needed to move the current state towards the desired
//! one.
//!
//! ## Flow
//!
//! ```text
//! current, desired
//!        │
//!        ▼
//! ┌───────────────┐   ┌──────────────┐   ┌─────────────────┐
//! │ record filter │──▶│ grouping     │──▶│ change detector │◀── ConflictResolver
//! └───────────────┘   │ table        │   └─────────────────┘
//!                     └──────────────┘            │ raw changes
//!                                                 ▼
//!                     ┌──────────────┐   ┌─────────────────┐
//!   final changes ◀───│ ownership    │◀──│ policies,       │
//!                     │ filter       │   │ missing records │
//!                     └──────────────┘   └─────────────────┘
//! ```
//!
//! ## Ordering
//!
//! Rows are visited in grouping-key order, so the output is deterministic for
//! a fixed input. Callers should still only rely on membership and on
//! `update_old[i]` / `update_new[i]` describing the same record.

mod filter;
mod table;

pub use filter::{filter_owned_records, filter_records_for_plan, is_managed_record};
pub use table::normalize_dns_name;

use crate::endpoint::{
    DomainFilter, Endpoint, MatchAllDomains, OWNER_LABEL_KEY, RECORD_TYPE_TXT,
    default_managed_record_types,
};
use crate::resolver::PerResource;
use crate::traits::{ConflictResolver, Policy, PropertyComparator};
use filter::filter_owned_updates;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use table::{PlanTable, PlanTableRow};
use tracing::{debug, info};

/// Actions to be executed by a DNS provider
///
/// `update_old[i]` and `update_new[i]` are the current and desired versions
/// of the same record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Changes {
    /// Records that need to be created
    pub create: Vec<Endpoint>,
    /// Records that need to be updated (current data)
    pub update_old: Vec<Endpoint>,
    /// Records that need to be updated (desired data)
    pub update_new: Vec<Endpoint>,
    /// Records that need to be deleted
    pub delete: Vec<Endpoint>,
}

impl Changes {
    /// Whether executing these changes would modify anything
    ///
    /// Update pairs whose old and new halves are structurally identical do
    /// not count.
    pub fn has_changes(&self) -> bool {
        if !self.create.is_empty() || !self.delete.is_empty() {
            return true;
        }
        self.update_new != self.update_old
    }

    /// Total number of actions (an update pair counts once)
    pub fn len(&self) -> usize {
        self.create.len() + self.update_new.len() + self.delete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of comparing one grouping-table row
#[derive(Debug, Clone, PartialEq, Eq)]
enum RowChange {
    NoOp,
    Create(Endpoint),
    Delete(Endpoint),
    Update { old: Endpoint, new: Endpoint },
    Migrate { old: Endpoint, new: Endpoint },
}

/// Snapshot of a reconciliation: inputs, strategies and, once calculated,
/// the resulting changes
///
/// A plan is never modified by [`Plan::calculate`]; every calculation
/// returns a fresh plan.
///
/// ## Example
///
/// ```rust
/// use dnsplan_core::{Endpoint, Plan};
///
/// let current = vec![Endpoint::new("old.example.com", "A", ["1.2.3.4"]).with_owner("me")];
/// let desired = vec![Endpoint::new("new.example.com", "A", ["1.2.3.4"]).with_owner("me")];
///
/// let plan = Plan::new(current, desired).with_owner_id("me").calculate();
/// let changes = plan.changes.unwrap_or_default();
///
/// assert_eq!(changes.create.len(), 1);
/// assert_eq!(changes.delete.len(), 1);
/// ```
#[derive(Clone)]
pub struct Plan {
    /// Records currently present on the provider
    pub current: Vec<Endpoint>,

    /// Records that should exist
    pub desired: Vec<Endpoint>,

    /// Records to create unconditionally (migration of an older on-the-wire
    /// format, e.g. legacy TXT ownership records)
    pub missing: Vec<Endpoint>,

    /// Policies applied, in order, to the computed changes
    pub policies: Vec<Arc<dyn Policy>>,

    /// Changes needed to converge; populated by [`Plan::calculate`]
    pub changes: Option<Changes>,

    /// Names outside this filter are ignored; `None` matches everything
    pub domain_filter: Option<Arc<dyn DomainFilter>>,

    /// Compares provider-specific properties; `None` means string equality
    pub property_comparator: Option<Arc<dyn PropertyComparator>>,

    /// Strategy picking one record among colliding desired records
    pub resolver: Arc<dyn ConflictResolver>,

    /// Record types considered for management
    pub managed_records: Vec<String>,

    /// Owner identity of this planner
    pub owner_id: String,

    /// Previous owner identity, taken over when `owner_migrate` is set
    pub owner_id_old: Option<String>,

    /// Relabel records owned by `owner_id_old` to `owner_id`
    pub owner_migrate: bool,

    /// Whether the last calculation migrated at least one record
    pub has_migrated: bool,
}

impl Plan {
    /// Create a plan over `current` and `desired` with the default strategies
    ///
    /// Defaults: [`PerResource`] resolver, no policies, no domain filter,
    /// string comparison of provider-specific properties, and the `A`,
    /// `AAAA` and `CNAME` record types.
    pub fn new(current: Vec<Endpoint>, desired: Vec<Endpoint>) -> Self {
        Self {
            current,
            desired,
            missing: Vec::new(),
            policies: Vec::new(),
            changes: None,
            domain_filter: None,
            property_comparator: None,
            resolver: Arc::new(PerResource::new()),
            managed_records: default_managed_record_types(),
            owner_id: String::new(),
            owner_id_old: None,
            owner_migrate: false,
            has_migrated: false,
        }
    }

    pub fn with_missing(mut self, missing: Vec<Endpoint>) -> Self {
        self.missing = missing;
        self
    }

    /// Append a policy to the chain
    pub fn with_policy(mut self, policy: Arc<dyn Policy>) -> Self {
        self.policies.push(policy);
        self
    }

    pub fn with_domain_filter(mut self, domain_filter: Arc<dyn DomainFilter>) -> Self {
        self.domain_filter = Some(domain_filter);
        self
    }

    pub fn with_property_comparator(mut self, comparator: Arc<dyn PropertyComparator>) -> Self {
        self.property_comparator = Some(comparator);
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn ConflictResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_managed_records<I, S>(mut self, record_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.managed_records = record_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_owner_id(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = owner_id.into();
        self
    }

    /// Take over records owned by `owner_id_old`
    pub fn with_owner_migration(mut self, owner_id_old: impl Into<String>) -> Self {
        self.owner_id_old = Some(owner_id_old.into());
        self.owner_migrate = true;
        self
    }

    /// Compute the actions needed to move current state towards desired state
    ///
    /// The raw changes pass through the policies, get the missing records
    /// appended and are finally restricted to records owned by this planner.
    /// Returns a new plan carrying the inputs and the resulting changes.
    pub fn calculate(&self) -> Plan {
        let domain_filter: Arc<dyn DomainFilter> = self
            .domain_filter
            .clone()
            .unwrap_or_else(|| Arc::new(MatchAllDomains) as Arc<dyn DomainFilter>);

        let mut table = PlanTable::new();
        for current in filter_records_for_plan(&self.current, domain_filter.as_ref(), &self.managed_records) {
            table.add_current(current);
        }
        for desired in filter_records_for_plan(&self.desired, domain_filter.as_ref(), &self.managed_records) {
            table.add_candidate(desired);
        }

        let mut changes = Changes::default();
        let mut has_migrated = false;

        for (_, row) in table.rows() {
            match self.detect_change(row) {
                RowChange::NoOp => {}
                RowChange::Create(record) => changes.create.push(record),
                RowChange::Delete(record) => changes.delete.push(record),
                RowChange::Update { old, new } => {
                    changes.update_old.push(old);
                    changes.update_new.push(new);
                }
                RowChange::Migrate { old, new } => {
                    has_migrated = true;
                    changes.update_old.push(old);
                    changes.update_new.push(new);
                }
            }
        }

        for policy in &self.policies {
            changes = policy.apply(changes);
        }

        if !self.missing.is_empty() {
            let mut managed = self.managed_records.clone();
            managed.push(RECORD_TYPE_TXT.to_string());
            changes
                .create
                .extend(filter_records_for_plan(&self.missing, domain_filter.as_ref(), &managed));
        }

        let changes = self.filter_owned(changes);
        debug!(
            "Calculated plan: {} to create, {} to update, {} to delete",
            changes.create.len(),
            changes.update_new.len(),
            changes.delete.len()
        );

        Plan {
            current: self.current.clone(),
            desired: self.desired.clone(),
            changes: Some(changes),
            managed_records: default_managed_record_types(),
            has_migrated,
            ..Plan::new(Vec::new(), Vec::new())
        }
    }

    /// Classify one row as exactly one of no-op, create, delete, update or
    /// owner migration
    fn detect_change(&self, row: &PlanTableRow) -> RowChange {
        let current = match &row.current {
            None if row.candidates.is_empty() => return RowChange::NoOp,
            None => return RowChange::Create(self.resolver.resolve_create(&row.candidates)),
            Some(current) => current,
        };

        if row.candidates.is_empty() {
            return RowChange::Delete(current.clone());
        }

        if let Some(migrated) = self.migrate_owner(current) {
            return RowChange::Migrate {
                old: current.clone(),
                new: migrated,
            };
        }

        let update = self.resolver.resolve_update(current, &row.candidates);
        if should_update_ttl(&update, current)
            || target_changed(&update, current)
            || self.should_update_provider_specific(&update, current)
        {
            return RowChange::Update {
                old: current.clone(),
                new: inherit_owner(current, update),
            };
        }

        RowChange::NoOp
    }

    /// Relabelled copy of `current` when it belongs to the previous owner
    fn migrate_owner(&self, current: &Endpoint) -> Option<Endpoint> {
        if !self.owner_migrate {
            return None;
        }
        let previous_owner = current.owner()?;
        if Some(previous_owner) != self.owner_id_old.as_deref() {
            return None;
        }

        info!(
            previous_owner,
            new_owner = %self.owner_id,
            dns_name = %current.dns_name,
            record_type = %current.record_type,
            "Found record to migrate"
        );

        let mut migrated = current.clone();
        migrated
            .labels
            .insert(OWNER_LABEL_KEY.to_string(), self.owner_id.clone());
        Some(migrated)
    }

    /// Compare provider-specific properties of `current` against `desired`
    ///
    /// Only properties present on `current` are checked; a property that is
    /// set on `desired` alone never causes an update.
    fn should_update_provider_specific(&self, desired: &Endpoint, current: &Endpoint) -> bool {
        let desired_properties: HashMap<&str, &str> = desired
            .provider_specific
            .iter()
            .map(|p| (p.name.as_str(), p.value.as_str()))
            .collect();

        current.provider_specific.iter().any(|c| {
            let desired_value = desired_properties.get(c.name.as_str()).copied().unwrap_or("");
            match &self.property_comparator {
                Some(comparator) => !comparator.equal(&c.name, &c.value, desired_value),
                None => c.value != desired_value,
            }
        })
    }

    fn filter_owned(&self, changes: Changes) -> Changes {
        let owner_id_old = self.owner_id_old.as_deref();
        let (update_old, update_new) = filter_owned_updates(
            &self.owner_id,
            owner_id_old,
            self.owner_migrate,
            changes.update_old,
            changes.update_new,
        );

        Changes {
            create: filter_owned_records(&self.owner_id, owner_id_old, self.owner_migrate, changes.create),
            update_old,
            update_new,
            delete: filter_owned_records(&self.owner_id, owner_id_old, self.owner_migrate, changes.delete),
        }
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl std::fmt::Debug for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let policies: Vec<&str> = self.policies.iter().map(|p| p.policy_name()).collect();
        f.debug_struct("Plan")
            .field("current", &self.current.len())
            .field("desired", &self.desired.len())
            .field("missing", &self.missing.len())
            .field("policies", &policies)
            .field("changes", &self.changes)
            .field("resolver", &self.resolver.resolver_name())
            .field("managed_records", &self.managed_records)
            .field("owner_id", &self.owner_id)
            .field("owner_id_old", &self.owner_id_old)
            .field("owner_migrate", &self.owner_migrate)
            .field("has_migrated", &self.has_migrated)
            .finish()
    }
}

/// New record carrying the owner label of `from`
///
/// Content updates never move ownership.
fn inherit_owner(from: &Endpoint, mut to: Endpoint) -> Endpoint {
    match from.owner() {
        Some(owner) => {
            to.labels.insert(OWNER_LABEL_KEY.to_string(), owner.to_string());
        }
        None => {
            to.labels.remove(OWNER_LABEL_KEY);
        }
    }
    to
}

fn target_changed(desired: &Endpoint, current: &Endpoint) -> bool {
    !desired.targets.same(&current.targets)
}

/// An unconfigured desired TTL never forces an update
fn should_update_ttl(desired: &Endpoint, current: &Endpoint) -> bool {
    desired.record_ttl.is_configured() && desired.record_ttl != current.record_ttl
}
