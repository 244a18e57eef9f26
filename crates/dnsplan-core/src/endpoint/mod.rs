//! DNS record model consumed by the planner
//!
//! An [`Endpoint`] is one named record: a DNS name, a record type, an optional
//! set identifier, a set of targets and some metadata. The planner only reads
//! the attributes declared here.

mod domain_filter;
mod targets;

pub use domain_filter::{DomainFilter, DomainFilterList, MatchAllDomains};
pub use targets::Targets;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label key carrying the owner identity of a record
pub const OWNER_LABEL_KEY: &str = "owner";

/// Label key carrying the resource that produced a record
pub const RESOURCE_LABEL_KEY: &str = "resource";

pub const RECORD_TYPE_A: &str = "A";
pub const RECORD_TYPE_AAAA: &str = "AAAA";
pub const RECORD_TYPE_CNAME: &str = "CNAME";
pub const RECORD_TYPE_TXT: &str = "TXT";
pub const RECORD_TYPE_SRV: &str = "SRV";
pub const RECORD_TYPE_NS: &str = "NS";
pub const RECORD_TYPE_PTR: &str = "PTR";
pub const RECORD_TYPE_MX: &str = "MX";
pub const RECORD_TYPE_NAPTR: &str = "NAPTR";

/// Record types managed when nothing else is configured
pub fn default_managed_record_types() -> Vec<String> {
    vec![
        RECORD_TYPE_A.to_string(),
        RECORD_TYPE_AAAA.to_string(),
        RECORD_TYPE_CNAME.to_string(),
    ]
}

/// Free-form labels attached to a record
pub type Labels = BTreeMap<String, String>;

/// Time-to-live of a record
///
/// `Ttl::default()` is the unconfigured state, which is distinct from every
/// explicit value including zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ttl(Option<i64>);

impl Ttl {
    /// An explicitly configured TTL
    pub fn new(seconds: i64) -> Self {
        Self(Some(seconds))
    }

    /// The unconfigured TTL
    pub fn unconfigured() -> Self {
        Self(None)
    }

    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    pub fn seconds(&self) -> Option<i64> {
        self.0
    }
}

/// A provider-specific property, opaque to the planner
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderSpecificProperty {
    pub name: String,
    pub value: String,
}

impl ProviderSpecificProperty {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A named DNS record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// The DNS name (e.g. "foo.example.com.")
    pub dns_name: String,

    /// Values the record points at
    #[serde(default)]
    pub targets: Targets,

    /// Record type tag (e.g. "A", "CNAME")
    pub record_type: String,

    /// Disambiguates records sharing name and type (weighted or failover sets)
    #[serde(default)]
    pub set_identifier: String,

    #[serde(default)]
    pub record_ttl: Ttl,

    /// Labels, including the owner identity under [`OWNER_LABEL_KEY`]
    #[serde(default)]
    pub labels: Labels,

    #[serde(default)]
    pub provider_specific: Vec<ProviderSpecificProperty>,
}

impl Endpoint {
    /// Create a record with no TTL, labels or provider-specific properties
    pub fn new<I, S>(dns_name: impl Into<String>, record_type: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dns_name: dns_name.into(),
            targets: targets.into_iter().collect(),
            record_type: record_type.into(),
            set_identifier: String::new(),
            record_ttl: Ttl::unconfigured(),
            labels: Labels::new(),
            provider_specific: Vec::new(),
        }
    }

    pub fn with_ttl(mut self, seconds: i64) -> Self {
        self.record_ttl = Ttl::new(seconds);
        self
    }

    pub fn with_set_identifier(mut self, set_identifier: impl Into<String>) -> Self {
        self.set_identifier = set_identifier.into();
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Stamp the owner label
    pub fn with_owner(self, owner: impl Into<String>) -> Self {
        self.with_label(OWNER_LABEL_KEY, owner)
    }

    /// Add or replace a provider-specific property
    pub fn with_provider_specific(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let property = ProviderSpecificProperty::new(name, value);
        match self
            .provider_specific
            .iter_mut()
            .find(|p| p.name == property.name)
        {
            Some(existing) => existing.value = property.value,
            None => self.provider_specific.push(property),
        }
        self
    }

    /// The owner identity, if the record declares one
    pub fn owner(&self) -> Option<&str> {
        self.labels.get(OWNER_LABEL_KEY).map(String::as_str)
    }

    pub fn get_provider_specific(&self, name: &str) -> Option<&str> {
        self.provider_specific
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// Parse a JSON array of records
///
/// Records without a DNS name or record type are rejected.
pub fn parse_records(json: &str) -> crate::Result<Vec<Endpoint>> {
    let records: Vec<Endpoint> = serde_json::from_str(json)?;

    for (index, record) in records.iter().enumerate() {
        if record.dns_name.trim().is_empty() {
            return Err(crate::Error::invalid_input(format!(
                "record {} has an empty dnsName",
                index
            )));
        }
        if record.record_type.trim().is_empty() {
            return Err(crate::Error::invalid_input(format!(
                "record {} ({}) has an empty recordType",
                index, record.dns_name
            )));
        }
    }

    Ok(records)
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ", self.dns_name)?;
        if let Some(ttl) = self.record_ttl.seconds() {
            write!(f, "{} ", ttl)?;
        }
        write!(f, "IN {} {} {}", self.record_type, self.set_identifier, self.targets)?;
        if !self.labels.is_empty() {
            write!(f, " {:?}", self.labels)?;
        }
        Ok(())
    }
}
