// # Conflict Resolver Trait
//
// Several desired records may want the same grouping key (same name, set
// identifier and type). The resolver picks the single record that is created,
// or compared against the current record.
//
// ## Implementations
//
// - `PerResource`: `crate::resolver` (the default)

use crate::endpoint::Endpoint;

/// Picks one record among colliding desired candidates
///
/// # Contract
///
/// - `candidates` is never empty when the planner calls either method.
/// - Results must be deterministic for a fixed input, otherwise consecutive
///   plans oscillate between candidates.
pub trait ConflictResolver: Send + Sync {
    /// Choose the record to create for an unoccupied key
    fn resolve_create(&self, candidates: &[Endpoint]) -> Endpoint;

    /// Choose the record to compare against the record currently holding the key
    fn resolve_update(&self, current: &Endpoint, candidates: &[Endpoint]) -> Endpoint;

    /// Name used in logs
    fn resolver_name(&self) -> &'static str;
}
