//! Grouping table
//!
//! Each row corresponds to one grouping key and holds the record currently
//! occupying that key plus every desired record that wants it.
//!
//! ```text
//! -----------------------------------------------------------------
//! DNS name  | current record | desired records             |
//! -----------------------------------------------------------------
//! foo.com.  | -> 1.1.1.1     | [->1.1.1.1, ->elb.com]      |  = no action
//! -----------------------------------------------------------------
//! bar.com.  |                | [->191.1.1.1, ->190.1.1.1]  |  = create (bar.com -> 190.1.1.1)
//! -----------------------------------------------------------------
//! ```
//!
//! "=" depends on the conflict resolver in use.

use crate::endpoint::Endpoint;
use std::collections::BTreeMap;
use tracing::warn;

/// Grouping key: normalized DNS name, set identifier and record type
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct PlanKey {
    pub dns_name: String,
    pub set_identifier: String,
    pub record_type: String,
}

impl PlanKey {
    pub fn for_endpoint(endpoint: &Endpoint) -> Self {
        Self {
            dns_name: normalize_dns_name(&endpoint.dns_name),
            set_identifier: endpoint.set_identifier.clone(),
            record_type: endpoint.record_type.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct PlanTableRow {
    /// The record currently occupying the key on the provider
    pub current: Option<Endpoint>,
    /// Desired records that would like the key, in input order
    pub candidates: Vec<Endpoint>,
}

/// Rows are created lazily on first reference and iterate in key order
#[derive(Debug, Default)]
pub(crate) struct PlanTable {
    rows: BTreeMap<PlanKey, PlanTableRow>,
}

impl PlanTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the current record for its key
    ///
    /// Providers are expected to report at most one record per key; a
    /// second one replaces the first.
    pub fn add_current(&mut self, endpoint: Endpoint) {
        let row = self.rows.entry(PlanKey::for_endpoint(&endpoint)).or_default();
        if let Some(previous) = row.current.replace(endpoint) {
            warn!(
                "Duplicate current record for {} {} (set identifier {:?}), keeping the last one",
                previous.dns_name, previous.record_type, previous.set_identifier
            );
        }
    }

    pub fn add_candidate(&mut self, endpoint: Endpoint) {
        self.rows
            .entry(PlanKey::for_endpoint(&endpoint))
            .or_default()
            .candidates
            .push(endpoint);
    }

    pub fn rows(&self) -> impl Iterator<Item = (&PlanKey, &PlanTableRow)> {
        self.rows.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub fn get(&self, key: &PlanKey) -> Option<&PlanTableRow> {
        self.rows.get(key)
    }
}

/// Canonical form of a DNS name so plain string equality can be used
///
/// Trims whitespace, lower-cases and ensures exactly one trailing dot.
pub fn normalize_dns_name(dns_name: &str) -> String {
    let mut name = dns_name.trim().to_lowercase();
    while name.ends_with("..") {
        name.pop();
    }
    if !name.ends_with('.') {
        name.push('.');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{RECORD_TYPE_A, RECORD_TYPE_CNAME};

    #[test]
    fn test_normalize_dns_name() {
        assert_eq!(normalize_dns_name("foo.com"), "foo.com.");
        assert_eq!(normalize_dns_name("  Foo.COM. "), "foo.com.");
        assert_eq!(normalize_dns_name("foo.com.."), "foo.com.");
    }

    #[test]
    fn test_key_merges_name_spellings() {
        let mut table = PlanTable::new();
        table.add_current(Endpoint::new("Foo.com", RECORD_TYPE_A, ["1.1.1.1"]));
        table.add_candidate(Endpoint::new("foo.com.", RECORD_TYPE_A, ["1.1.1.1"]));

        assert_eq!(table.len(), 1);
        let (_, row) = table.rows().next().unwrap();
        assert!(row.current.is_some());
        assert_eq!(row.candidates.len(), 1);
    }

    #[test]
    fn test_type_and_set_identifier_split_rows() {
        let mut table = PlanTable::new();
        table.add_candidate(Endpoint::new("foo.com", RECORD_TYPE_A, ["1.1.1.1"]));
        table.add_candidate(Endpoint::new("foo.com", RECORD_TYPE_CNAME, ["elb.com"]));
        table.add_candidate(Endpoint::new("foo.com", RECORD_TYPE_A, ["2.2.2.2"]).with_set_identifier("eu"));

        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_current_last_write_wins() {
        let mut table = PlanTable::new();
        table.add_current(Endpoint::new("foo.com", RECORD_TYPE_A, ["1.1.1.1"]));
        table.add_current(Endpoint::new("foo.com", RECORD_TYPE_A, ["2.2.2.2"]));

        let key = PlanKey::for_endpoint(&Endpoint::new("foo.com", RECORD_TYPE_A, Vec::<String>::new()));
        let row = table.get(&key).unwrap();
        assert_eq!(row.current.as_ref().unwrap().targets.iter().next().unwrap(), "2.2.2.2");
    }

    #[test]
    fn test_candidates_keep_input_order() {
        let mut table = PlanTable::new();
        table.add_candidate(Endpoint::new("foo.com", RECORD_TYPE_A, ["2.2.2.2"]));
        table.add_candidate(Endpoint::new("foo.com", RECORD_TYPE_A, ["1.1.1.1"]));

        let (_, row) = table.rows().next().unwrap();
        let firsts: Vec<&str> = row
            .candidates
            .iter()
            .map(|c| c.targets.iter().next().unwrap().as_str())
            .collect();
        assert_eq!(firsts, vec!["2.2.2.2", "1.1.1.1"]);
    }
}
