//! Property comparators
//!
//! Provider-specific properties such as `proxied` are often boolean flags
//! where a missing value means the provider default. Comparing them as plain
//! strings would report `"" != "false"` as a change on every run.

use crate::traits::PropertyComparator;
use std::collections::BTreeMap;

/// Compare two values as booleans
///
/// Empty or unparseable values fall back to `default`. Accepted spellings
/// are `1`, `t`, `T`, `TRUE`, `true`, `True` and their false counterparts.
pub fn compare_boolean(default: bool, _name: &str, current: &str, previous: &str) -> bool {
    parse_bool(previous).unwrap_or(default) == parse_bool(current).unwrap_or(default)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Boolean semantics for a fixed set of properties
///
/// Properties listed here are compared with [`compare_boolean`] using their
/// own default; every other property is compared as a plain string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BooleanPropertyComparator {
    defaults: BTreeMap<String, bool>,
}

impl BooleanPropertyComparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, name: impl Into<String>, default: bool) -> Self {
        self.defaults.insert(name.into(), default);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty()
    }
}

impl FromIterator<(String, bool)> for BooleanPropertyComparator {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self {
            defaults: iter.into_iter().collect(),
        }
    }
}

impl PropertyComparator for BooleanPropertyComparator {
    fn equal(&self, name: &str, previous: &str, current: &str) -> bool {
        match self.defaults.get(name) {
            Some(default) => compare_boolean(*default, name, current, previous),
            None => previous == current,
        }
    }
}
