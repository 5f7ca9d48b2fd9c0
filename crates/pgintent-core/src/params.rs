//! Caller-owned parameter sets.

use crate::value::SqlValue;

/// Named parameters bound to one statement.
///
/// Created empty by the caller, filled by one compilation, then handed to
/// whatever executes the statement. Entries are only ever inserted, never
/// overwritten. Iteration follows insertion order, so drivers that bind
/// positionally can walk the set as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParameters {
    entries: Vec<(String, SqlValue)>,
}

impl QueryParameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Binds `value` under `name`, or under the name it is already bound to.
    ///
    /// Returns `name` when it is free or already holds an equal value.
    /// When `name` holds a different value the first free `name_2`,
    /// `name_3`, ... is used instead, so an existing binding never changes.
    pub fn insert_or_reuse(&mut self, name: &str, value: SqlValue) -> String {
        let mut candidate = String::from(name);
        let mut suffix = 1_usize;
        loop {
            match self.get(&candidate) {
                None => {
                    self.entries.push((candidate.clone(), value));
                    return candidate;
                }
                Some(existing) if *existing == value => return candidate,
                Some(_) => {
                    suffix += 1;
                    candidate = format!("{name}_{suffix}");
                }
            }
        }
    }

    /// Returns the value bound under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Returns true if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterates over parameter names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl IntoIterator for QueryParameters {
    type Item = (String, SqlValue);
    type IntoIter = std::vec::IntoIter<(String, SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_then_reuse_equal_value() {
        let mut params = QueryParameters::new();
        assert_eq!(params.insert_or_reuse("id", SqlValue::Int(1)), "id");
        assert_eq!(params.insert_or_reuse("id", SqlValue::Int(1)), "id");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_conflicting_value_gets_fresh_name() {
        let mut params = QueryParameters::new();
        params.insert_or_reuse("role", SqlValue::Text(String::from("admin")));
        let second = params.insert_or_reuse("role", SqlValue::Text(String::from("mod")));
        let third = params.insert_or_reuse("role", SqlValue::Text(String::from("guest")));
        assert_eq!(second, "role_2");
        assert_eq!(third, "role_3");
        assert_eq!(
            params.get("role"),
            Some(&SqlValue::Text(String::from("admin")))
        );
        assert_eq!(params.names().collect::<Vec<_>>(), ["role", "role_2", "role_3"]);
    }

    #[test]
    fn test_into_iter_preserves_order() {
        let mut params = QueryParameters::new();
        params.insert_or_reuse("b", SqlValue::Bool(true));
        params.insert_or_reuse("a", SqlValue::Null);
        let names: Vec<String> = params.into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a"]);
    }
}
