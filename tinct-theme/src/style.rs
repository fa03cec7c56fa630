//! # Style Sets
//!
//! A [StyleSet] maps style-role names (`primary`, `accent`, `border`, ...) to
//! CSS color values. Insertion order is preserved so that projecting a set onto
//! a style target is deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping from style-role name to color value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleSet {
    values: IndexMap<String, String>,
}

impl StyleSet {
    /// Create an empty style set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, role: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(role, value);
        self
    }

    /// Insert or replace a role value.
    pub fn insert(&mut self, role: impl Into<String>, value: impl Into<String>) {
        self.values.insert(role.into(), value.into());
    }

    /// Get the value of a role.
    pub fn get(&self, role: &str) -> Option<&str> {
        self.values.get(role).map(String::as_str)
    }

    /// Whether the role is defined.
    pub fn contains(&self, role: &str) -> bool {
        self.values.contains_key(role)
    }

    /// Iterate `(role, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Role names in insertion order.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of roles.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no roles are defined.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The first role name that is not a valid identifier, if any.
    pub(crate) fn first_invalid_role(&self) -> Option<&str> {
        self.roles().find(|role| !is_valid_role(role))
    }
}

impl<K, V> FromIterator<(K, V)> for StyleSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a StyleSet {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Role names become custom property names, so keep them to `[A-Za-z0-9-]`.
pub fn is_valid_role(role: &str) -> bool {
    !role.is_empty() && role.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
