//! Domain types shared by every templater crate.
//!
//! A [`ParameterSet`] can only be built through [`ParameterSet::new`], so any
//! value of that type already satisfies the validation rules: non-empty, and
//! every key is an identifier an expression can reference.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed parameter name (the `project` in `${project}`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ParameterName(pub String);

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ParameterName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ParameterName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl ParameterName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns `true` when `s` is usable as a parameter name inside `${...}`.
///
/// First character: letter or `_`. Remaining characters: letters, digits, `_`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

// ---------------------------------------------------------------------------
// ParameterSet
// ---------------------------------------------------------------------------

/// Immutable, validated mapping of parameter names to values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSet {
    values: BTreeMap<ParameterName, String>,
}

impl ParameterSet {
    /// Validate `values` and freeze them into a [`ParameterSet`].
    ///
    /// Keys are checked in sorted order, so the reported key is stable when
    /// several are invalid.
    pub fn new<I, K, V>(values: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values: BTreeMap<ParameterName, String> = values
            .into_iter()
            .map(|(k, v)| (ParameterName(k.into()), v.into()))
            .collect();

        if values.is_empty() {
            return Err(ConfigError::EmptyParameters);
        }
        for key in values.keys() {
            if key.0.contains('-') {
                return Err(ConfigError::InvalidParameterKey {
                    key: key.0.clone(),
                    reason: "keys can't contain '-'",
                });
            }
            if !is_identifier(&key.0) {
                return Err(ConfigError::InvalidParameterKey {
                    key: key.0.clone(),
                    reason: "keys must start with a letter or '_' and contain only letters, digits or '_'",
                });
            }
        }
        Ok(Self { values })
    }

    /// Look up the value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(&ParameterName::from(name))
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `false` for any set built by [`ParameterSet::new`].
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParameterName, &str)> {
        self.values.iter().map(|(k, v)| (k, v.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
