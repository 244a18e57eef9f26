/// Decides whether two values of a provider-specific property are equal
///
/// Returning `true` means "equal enough": no update is needed for this
/// property. Any `Fn(&str, &str, &str) -> bool` closure is a comparator.
pub trait PropertyComparator: Send + Sync {
    /// Compare the `previous` (current record) and `current` (desired record)
    /// values of property `name`
    fn equal(&self, name: &str, previous: &str, current: &str) -> bool;
}

impl<F> PropertyComparator for F
where
    F: Fn(&str, &str, &str) -> bool + Send + Sync,
{
    fn equal(&self, name: &str, previous: &str, current: &str) -> bool {
        self(name, previous, current)
    }
}
