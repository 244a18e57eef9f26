//! Reference policies
//!
//! | name          | creates | updates | deletes |
//! |---------------|---------|---------|---------|
//! | `sync`        | kept    | kept    | kept    |
//! | `upsert-only` | kept    | kept    | dropped |
//! | `create-only` | kept    | dropped | dropped |

use crate::plan::Changes;
use crate::traits::Policy;

/// Full synchronization: changes pass through untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncPolicy;

impl Policy for SyncPolicy {
    fn apply(&self, changes: Changes) -> Changes {
        changes
    }

    fn policy_name(&self) -> &'static str {
        "sync"
    }
}

/// Never delete records
#[derive(Debug, Clone, Copy, Default)]
pub struct UpsertOnlyPolicy;

impl Policy for UpsertOnlyPolicy {
    fn apply(&self, changes: Changes) -> Changes {
        Changes {
            delete: Vec::new(),
            ..changes
        }
    }

    fn policy_name(&self) -> &'static str {
        "upsert-only"
    }
}

/// Only ever create records
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateOnlyPolicy;

impl Policy for CreateOnlyPolicy {
    fn apply(&self, changes: Changes) -> Changes {
        Changes {
            create: changes.create,
            ..Changes::default()
        }
    }

    fn policy_name(&self) -> &'static str {
        "create-only"
    }
}
