//! Form values and field-level errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Current values of a form, keyed by field name.
pub type FormValues = serde_json::Map<String, serde_json::Value>;

/// Field-level validation messages keyed by field path.
///
/// List items use `list[index].field` paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.insert(path.into(), message.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    /// Merge errors of a nested form under `prefix`.
    pub fn extend_prefixed(&mut self, prefix: &str, other: FieldErrors) {
        for (path, message) in other.0 {
            self.0.insert(format!("{prefix}.{path}"), message);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
