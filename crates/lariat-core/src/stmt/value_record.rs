use super::Value;

use indexmap::IndexMap;

/// An insertion-ordered record of named values.
///
/// Driver rows, rehydrated result objects, and nested scope bags are all
/// records. Field order matters: it mirrors the column order of the SELECT
/// that produced the row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueRecord {
    fields: IndexMap<String, Value>,
}

impl ValueRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(fields: Vec<(String, Value)>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Returns the value at the record entry, inserting an empty nested
    /// record if the entry is vacant.
    pub fn entry_record(&mut self, name: &str) -> &mut ValueRecord {
        let value = self
            .fields
            .entry(name.to_string())
            .or_insert_with(|| Value::Record(ValueRecord::new()));

        match value {
            Value::Record(record) => record,
            // A scalar landed here first; the nested path wins.
            other => {
                *other = Value::Record(ValueRecord::new());
                match other {
                    Value::Record(record) => record,
                    _ => unreachable!(),
                }
            }
        }
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }
}

impl FromIterator<(String, Value)> for ValueRecord {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ValueRecord {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
