//! Strategy traits the planner is composed from
//!
//! - [`ConflictResolver`]: pick one record among colliding desired records
//! - [`Policy`]: post-process the computed change set
//! - [`PropertyComparator`]: compare provider-specific property values

pub mod conflict_resolver;
pub mod policy;
pub mod property_comparator;

pub use conflict_resolver::ConflictResolver;
pub use policy::Policy;
pub use property_comparator::PropertyComparator;
