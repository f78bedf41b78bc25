use std::{collections::BTreeMap, str::FromStr};

use serde::{Deserialize, Serialize};

/// Raw values submitted for a form, keyed by field name.
///
/// A field may carry several values (multi-select checkboxes); single-valued
/// fields read the last one submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, Vec<String>>);

impl FormData {
    /// Creates an empty submission.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.entry(name.into()).or_default().push(value.into());
    }

    /// Appends a value for `name`, returning the submission.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns the last value submitted for `name`.
    ///
    /// A repeated single-valued field takes its final value, so a later
    /// `--field NAME=VALUE` overrides an earlier one.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Returns every value submitted for `name`.
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the names of all submitted fields.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (name, value) in iter {
            data.insert(name, value);
        }
        data
    }
}

/// A single `NAME=VALUE` pair, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    /// The field name.
    pub name: String,
    /// The submitted value, possibly empty.
    pub value: String,
}

/// Error returned when a `NAME=VALUE` pair has no `=` or an empty name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid field value '{0}': expected NAME=VALUE")]
pub struct InvalidFieldValue(String);

impl FromStr for FieldValue {
    type Err = InvalidFieldValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok(Self {
                name: name.to_string(),
                value: value.to_string(),
            }),
            _ => Err(InvalidFieldValue(s.to_string())),
        }
    }
}

impl FromIterator<FieldValue> for FormData {
    fn from_iter<I: IntoIterator<Item = FieldValue>>(iter: I) -> Self {
        iter.into_iter().map(|fv| (fv.name, fv.value)).collect()
    }
}
