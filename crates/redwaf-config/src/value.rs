//! Typed value model for the restricted config grammar

use std::borrow::Cow;
use std::collections::HashMap;

/// A single configuration value
///
/// `Raw` preserves numeric and bare-token literals as their source text;
/// the parser does not interpret numbers, coercion is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// `true` / `false` literal
    Bool(bool),
    /// Explicit `nil`
    Nil,
    /// Quoted literal or multi-line `[[ ... ]]` block, quotes stripped
    Str(String),
    /// Array literal, quoted members only, source order preserved
    List(Vec<String>),
    /// Anything else, trimmed, trailing comma stripped
    Raw(String),
}

impl ConfigValue {
    /// Render the value as scalar text, if it has one
    ///
    /// `Str` and `Raw` yield their content, `Bool` yields `true`/`false`.
    /// `Nil` and `List` have no scalar rendering.
    pub fn as_scalar_text(&self) -> Option<Cow<'_, str>> {
        match self {
            ConfigValue::Bool(true) => Some(Cow::Borrowed("true")),
            ConfigValue::Bool(false) => Some(Cow::Borrowed("false")),
            ConfigValue::Str(s) | ConfigValue::Raw(s) => Some(Cow::Borrowed(s)),
            ConfigValue::Nil | ConfigValue::List(_) => None,
        }
    }

    /// The list members, if this is a `List`
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this is the explicit `nil` marker
    pub fn is_nil(&self) -> bool {
        matches!(self, ConfigValue::Nil)
    }
}

/// Parsed result of a configuration source
///
/// Identifier to value, case-sensitive, last occurrence wins. Built once
/// per parse and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    entries: HashMap<String, ConfigValue>,
}

impl ConfigMap {
    pub(crate) fn new(entries: HashMap<String, ConfigValue>) -> Self {
        Self { entries }
    }

    /// Look up a value by identifier
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    /// Scalar text of a value, if present and scalar
    pub fn get_scalar(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).and_then(ConfigValue::as_scalar_text)
    }

    /// Whether the map contains an identifier
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of parsed assignments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries (arbitrary order)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
