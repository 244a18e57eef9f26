//! Conflict resolution strategies
//!
//! [`PerResource`] is the default strategy: a key that is already held keeps
//! following the resource that acquired it, and a free key goes to the
//! candidate with the smallest target set.

use crate::endpoint::{Endpoint, RESOURCE_LABEL_KEY};
use crate::traits::ConflictResolver;
use std::cmp::Ordering;

/// Resolve conflicts by the resource that produced each record
#[derive(Debug, Clone, Copy, Default)]
pub struct PerResource;

impl PerResource {
    pub fn new() -> Self {
        Self
    }

    fn ordering(x: &Endpoint, y: &Endpoint) -> Ordering {
        if x.targets.is_less(&y.targets) {
            Ordering::Less
        } else if y.targets.is_less(&x.targets) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl ConflictResolver for PerResource {
    /// Take the candidate with the "minimal" target set; ties keep the
    /// earliest candidate.
    ///
    /// # Panics
    ///
    /// Panics if `candidates` is empty.
    fn resolve_create(&self, candidates: &[Endpoint]) -> Endpoint {
        let mut min = &candidates[0];
        for candidate in &candidates[1..] {
            if candidate.targets.is_less(&min.targets) {
                min = candidate;
            }
        }
        min.clone()
    }

    /// Prefer the candidate coming from the resource that already holds the
    /// record, otherwise fall back to [`PerResource::resolve_create`].
    fn resolve_update(&self, current: &Endpoint, candidates: &[Endpoint]) -> Endpoint {
        let current_resource = current.labels.get(RESOURCE_LABEL_KEY);

        let mut sorted: Vec<&Endpoint> = candidates.iter().collect();
        sorted.sort_by(|x, y| Self::ordering(x, y));

        sorted
            .into_iter()
            .find(|c| c.labels.get(RESOURCE_LABEL_KEY) == current_resource)
            .cloned()
            .unwrap_or_else(|| self.resolve_create(candidates))
    }

    fn resolver_name(&self) -> &'static str {
        "per-resource"
    }
}
