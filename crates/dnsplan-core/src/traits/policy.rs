// # Policy Trait
//
// A policy post-processes the raw change set before ownership filtering.
// Policies run once each, in the order they were given to the plan.
//
// ## Implementations
//
// - `SyncPolicy`, `UpsertOnlyPolicy`, `CreateOnlyPolicy`: `crate::policy`

use crate::plan::Changes;

/// Transformation applied to computed changes
///
/// A policy may add, remove or rewrite entries but must keep
/// `update_old[i]` and `update_new[i]` describing the same record.
pub trait Policy: Send + Sync {
    fn apply(&self, changes: Changes) -> Changes;

    /// Registry name of the policy (e.g. "sync", "upsert-only")
    fn policy_name(&self) -> &'static str;
}
