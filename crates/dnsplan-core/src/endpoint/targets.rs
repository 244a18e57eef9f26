use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::net::IpAddr;

/// The values a record points at
///
/// Order carries no meaning: two target lists are the same when they hold
/// the same values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Targets(Vec<String>);

impl Targets {
    pub fn new(targets: Vec<String>) -> Self {
        Self(targets)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Set equality, ignoring order and case
    ///
    /// IP addresses are compared by value, so differently spelled IPv6
    /// addresses are still the same target.
    pub fn same(&self, other: &Targets) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.canonical() == other.canonical()
    }

    /// Stable ordering used to pick between competing candidates
    ///
    /// Fewer targets come first. Equal-length lists are compared element-wise
    /// after sorting, where IP addresses sort before hostnames.
    pub fn is_less(&self, other: &Targets) -> bool {
        match self.len().cmp(&other.len()) {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => {}
        }

        let mut ours: Vec<&str> = self.0.iter().map(String::as_str).collect();
        let mut theirs: Vec<&str> = other.0.iter().map(String::as_str).collect();
        ours.sort_by(|a, b| compare_target(a, b));
        theirs.sort_by(|a, b| compare_target(a, b));

        for (a, b) in ours.iter().zip(theirs.iter()) {
            match compare_target(a, b) {
                Ordering::Equal => continue,
                ordering => return ordering == Ordering::Less,
            }
        }
        false
    }

    fn canonical(&self) -> Vec<String> {
        let mut values: Vec<String> = self.0.iter().map(|t| canonical_target(t)).collect();
        values.sort();
        values
    }
}

fn canonical_target(target: &str) -> String {
    let trimmed = target.trim();
    match trimmed.parse::<IpAddr>() {
        Ok(ip) => ip.to_string(),
        Err(_) => trimmed.to_lowercase(),
    }
}

fn compare_target(a: &str, b: &str) -> Ordering {
    match (a.parse::<IpAddr>(), b.parse::<IpAddr>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

impl<S: Into<String>> FromIterator<S> for Targets {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Targets {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for Targets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.join(";"))
    }
}
