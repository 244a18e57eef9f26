// # dnsplan-core
//
// Core library of the DNS reconciliation planner.
//
// ## Architecture Overview
//
// Given the records a provider currently holds and the records that should
// exist, the planner computes the creates, updates and deletes needed to
// converge, restricted to records this planner owns:
// - **Endpoint**: The record model and domain filters
// - **Plan**: Grouping, change detection, ownership filtering and migration
// - **ConflictResolver**: Trait picking one record among colliding desired records
// - **Policy**: Trait post-processing the computed changes
// - **PropertyComparator**: Trait comparing provider-specific properties
// - **PolicyRegistry**: Name-based lookup of policies for configuration
//
// ## Design Principles
//
// 1. **Pure**: Calculating a plan performs no I/O and never fails
// 2. **Snapshot-Based**: Every calculation returns a new plan, inputs are never mutated
// 3. **Pluggable**: Resolver, policies and comparator are injected, with documented defaults
// 4. **Deterministic**: Fixed input yields the same changes in the same order
// 5. **Ownership-Safe**: Records owned by someone else are never touched

pub mod comparator;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod plan;
pub mod policy;
pub mod registry;
pub mod resolver;
pub mod traits;

// Re-export core types for convenience
pub use comparator::{BooleanPropertyComparator, compare_boolean};
pub use config::{DomainFilterConfig, PlanConfig};
pub use endpoint::{DomainFilter, DomainFilterList, Endpoint, MatchAllDomains, Targets, Ttl};
pub use error::{Error, Result};
pub use plan::{Changes, Plan};
pub use policy::{CreateOnlyPolicy, SyncPolicy, UpsertOnlyPolicy};
pub use registry::PolicyRegistry;
pub use resolver::PerResource;
pub use traits::{ConflictResolver, Policy, PropertyComparator};
