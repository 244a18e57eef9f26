//! Policy registry
//!
//! Maps policy names, as they appear in configuration, to policy instances so
//! the planner can be configured without hardcoded match chains.
//!
//! ## Usage
//!
//! ```rust
//! use dnsplan_core::registry::PolicyRegistry;
//!
//! let registry = PolicyRegistry::with_defaults();
//! let policy = registry.create_policy("upsert-only").unwrap();
//! assert_eq!(policy.policy_name(), "upsert-only");
//! ```
//!
//! ## Registration
//!
//! Additional policies can be registered next to the built-in ones:
//!
//! ```rust,ignore
//! registry.register_policy("a-only", Arc::new(AddressOnlyPolicy));
//! ```

use crate::error::{Error, Result};
use crate::policy::{CreateOnlyPolicy, SyncPolicy, UpsertOnlyPolicy};
use crate::traits::Policy;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of named policies
#[derive(Default)]
pub struct PolicyRegistry {
    policies: HashMap<String, Arc<dyn Policy>>,
}

impl PolicyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding `sync`, `upsert-only` and `create-only`
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_policy("sync", Arc::new(SyncPolicy));
        registry.register_policy("upsert-only", Arc::new(UpsertOnlyPolicy));
        registry.register_policy("create-only", Arc::new(CreateOnlyPolicy));
        registry
    }

    /// Register a policy under `name`, replacing any previous registration
    pub fn register_policy(&mut self, name: impl Into<String>, policy: Arc<dyn Policy>) {
        self.policies.insert(name.into(), policy);
    }

    /// Look up a policy by name
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn Policy>)`: The registered policy
    /// - `Err(Error::UnknownPolicy)`: If nothing is registered under `name`
    pub fn create_policy(&self, name: &str) -> Result<Arc<dyn Policy>> {
        self.policies
            .get(name)
            .cloned()
            .ok_or_else(|| Error::unknown_policy(name))
    }

    /// List registered policy names, sorted
    pub fn list_policies(&self) -> Vec<String> {
        let mut names: Vec<String> = self.policies.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_policy(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }
}
