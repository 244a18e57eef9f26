/// Decides which DNS names the planner may touch
pub trait DomainFilter: Send + Sync {
    /// Whether `name` falls under this filter
    fn matches(&self, name: &str) -> bool;
}

/// Filter that accepts every name
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAllDomains;

impl DomainFilter for MatchAllDomains {
    fn matches(&self, _name: &str) -> bool {
        true
    }
}

/// Include/exclude list of domain suffixes
///
/// A name matches when it equals or is a subdomain of an included domain
/// (an empty include list includes everything) and is not equal to or a
/// subdomain of an excluded one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainFilterList {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl DomainFilterList {
    pub fn new<I, S>(include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            include: normalize_domains(include),
            exclude: Vec::new(),
        }
    }

    pub fn with_exclusions<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude = normalize_domains(exclude);
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.include.is_empty() || !self.exclude.is_empty()
    }
}

impl DomainFilter for DomainFilterList {
    fn matches(&self, name: &str) -> bool {
        let name = normalize_domain(name);
        let included =
            self.include.is_empty() || self.include.iter().any(|d| is_within(&name, d));
        included && !self.exclude.iter().any(|d| is_within(&name, d))
    }
}

fn normalize_domains<I, S>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    domains
        .into_iter()
        .map(|d| normalize_domain(d.as_ref()))
        .filter(|d| !d.is_empty())
        .collect()
}

fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_lowercase()
}

fn is_within(name: &str, domain: &str) -> bool {
    name == domain
        || name
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
