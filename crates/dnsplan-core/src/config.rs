//! Configuration types for the planner
//!
//! [`PlanConfig`] describes everything about a plan except the records
//! themselves: ownership, managed record types, domain filtering, the policy
//! and how provider-specific properties are compared.

use crate::comparator::BooleanPropertyComparator;
use crate::endpoint::{DomainFilterList, Endpoint, default_managed_record_types};
use crate::plan::Plan;
use crate::registry::PolicyRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Main planner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Owner identity stamped on and required of managed records
    pub owner_id: String,

    /// Previous owner identity to migrate away from
    #[serde(default)]
    pub owner_id_old: Option<String>,

    /// Take over records owned by `owner_id_old`
    #[serde(default)]
    pub owner_migrate: bool,

    /// Record types considered for management
    #[serde(default = "default_managed_record_types")]
    pub managed_record_types: Vec<String>,

    /// Domains the planner may touch
    #[serde(default)]
    pub domain_filter: DomainFilterConfig,

    /// Name of the policy applied to computed changes
    #[serde(default = "default_policy")]
    pub policy: String,

    /// Provider-specific properties compared as booleans, with their default
    ///
    /// Leave empty to compare every property as a plain string.
    #[serde(default)]
    pub boolean_properties: BTreeMap<String, bool>,
}

impl PlanConfig {
    /// Create a configuration with defaults for the given owner
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            owner_id_old: None,
            owner_migrate: false,
            managed_record_types: default_managed_record_types(),
            domain_filter: DomainFilterConfig::default(),
            policy: default_policy(),
            boolean_properties: BTreeMap::new(),
        }
    }

    /// Enable migration from a previous owner identity
    pub fn with_owner_migration(mut self, owner_id_old: impl Into<String>) -> Self {
        self.owner_id_old = Some(owner_id_old.into());
        self.owner_migrate = true;
        self
    }

    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = policy.into();
        self
    }

    pub fn with_boolean_property(mut self, name: impl Into<String>, default: bool) -> Self {
        self.boolean_properties.insert(name.into(), default);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.owner_id.trim().is_empty() {
            return Err(crate::Error::config("Owner ID cannot be empty"));
        }

        if self.owner_migrate {
            match self.owner_id_old.as_deref().map(str::trim) {
                None | Some("") => {
                    return Err(crate::Error::config(
                        "Owner migration requires the previous owner ID",
                    ));
                }
                Some(old) if old == self.owner_id.trim() => {
                    return Err(crate::Error::config(
                        "Previous owner ID must differ from the owner ID",
                    ));
                }
                Some(_) => {}
            }
        }

        if self.managed_record_types.is_empty() {
            return Err(crate::Error::config("No managed record types configured"));
        }
        if self.managed_record_types.iter().any(|t| t.trim().is_empty()) {
            return Err(crate::Error::config("Managed record types cannot be empty"));
        }

        if self.policy.trim().is_empty() {
            return Err(crate::Error::config("Policy name cannot be empty"));
        }

        Ok(())
    }

    /// Build a ready-to-calculate plan over the given records
    ///
    /// # Returns
    ///
    /// - `Ok(Plan)`: The configured plan
    /// - `Err(Error)`: If the configuration is invalid or the policy is unknown
    pub fn build_plan(
        &self,
        current: Vec<Endpoint>,
        desired: Vec<Endpoint>,
        registry: &PolicyRegistry,
    ) -> Result<Plan, crate::Error> {
        self.validate()?;

        let mut plan = Plan::new(current, desired)
            .with_owner_id(self.owner_id.clone())
            .with_managed_records(self.managed_record_types.iter().cloned())
            .with_policy(registry.create_policy(&self.policy)?);

        if self.owner_migrate {
            if let Some(old) = &self.owner_id_old {
                plan = plan.with_owner_migration(old.clone());
            }
        }

        if self.domain_filter.is_configured() {
            plan = plan.with_domain_filter(Arc::new(self.domain_filter.to_filter()));
        }

        if !self.boolean_properties.is_empty() {
            let comparator: BooleanPropertyComparator = self
                .boolean_properties
                .iter()
                .map(|(name, default)| (name.clone(), *default))
                .collect();
            plan = plan.with_property_comparator(Arc::new(comparator));
        }

        Ok(plan)
    }
}

/// Domain filter configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainFilterConfig {
    /// Domains to include (empty = all)
    #[serde(default)]
    pub include: Vec<String>,

    /// Domains to exclude, even when included
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl DomainFilterConfig {
    pub fn is_configured(&self) -> bool {
        !self.include.is_empty() || !self.exclude.is_empty()
    }

    pub fn to_filter(&self) -> DomainFilterList {
        DomainFilterList::new(&self.include).with_exclusions(&self.exclude)
    }
}

fn default_policy() -> String {
    "sync".to_string()
}
