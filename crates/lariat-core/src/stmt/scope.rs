use super::Value;

use indexmap::IndexMap;

/// The caller-supplied bag of named values available to the translator.
///
/// The scope bag is the only channel through which values from the enclosing
/// environment reach a callback: an identifier path that does not resolve
/// against the current projection is looked up here by its dot-path. Nested
/// paths descend through [`Value::Record`] entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    entries: IndexMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow-merges `other` into this scope. Later keys win on conflict.
    pub fn merge(&mut self, other: Scope) {
        for (name, value) in other.entries {
            self.entries.insert(name, value);
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Looks up a dot-path, descending through nested records.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut value = self.entries.get(segments.next()?)?;

        for segment in segments {
            value = value.as_record()?.get(segment)?;
        }

        Some(value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Value)> for Scope {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(&str, Value); N]> for Scope {
    fn from(entries: [(&str, Value); N]) -> Self {
        entries
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::ValueRecord;

    #[test]
    fn lookup_flat() {
        let scope = Scope::from([("foo", Value::I64(1))]);
        assert_eq!(scope.get("foo"), Some(&Value::I64(1)));
        assert_eq!(scope.get("bar"), None);
    }

    #[test]
    fn lookup_nested() {
        let mut inner = ValueRecord::new();
        inner.insert("min", 10i64);

        let scope = Scope::from([("limits", Value::Record(inner))]);
        assert_eq!(scope.get("limits.min"), Some(&Value::I64(10)));
        assert_eq!(scope.get("limits.max"), None);
        // Descending through a scalar is not a path
        assert_eq!(scope.get("limits.min.extra"), None);
    }

    #[test]
    fn merge_later_wins() {
        let mut scope = Scope::from([("a", Value::I64(1)), ("b", Value::I64(2))]);
        scope.merge(Scope::from([("b", Value::I64(3)), ("c", Value::I64(4))]));

        assert_eq!(scope.get("a"), Some(&Value::I64(1)));
        assert_eq!(scope.get("b"), Some(&Value::I64(3)));
        assert_eq!(scope.get("c"), Some(&Value::I64(4)));
    }
}
