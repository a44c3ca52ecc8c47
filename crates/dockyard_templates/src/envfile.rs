//! `key=value` environment files.
//!
//! Parsing rules shared by templates and docked modules:
//! lines are trimmed, blank lines and `#` comments are skipped, and each
//! remaining line is split on its first `=`. Lines without `=` are dropped.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// One `key=value` line of an environment template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvTemplateEntry {
    pub key: String,
    pub raw_value: String,
}

/// Classified template value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvValue<'a> {
    /// Used as-is.
    Literal(&'a str),
    /// `<name>`: resolved per placeholder name.
    Placeholder(&'a str),
}

impl EnvTemplateEntry {
    pub fn value(&self) -> EnvValue<'_> {
        match self
            .raw_value
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
        {
            Some(name) => EnvValue::Placeholder(name),
            None => EnvValue::Literal(&self.raw_value),
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match self.value() {
            EnvValue::Placeholder(name) => Some(name),
            EnvValue::Literal(_) => None,
        }
    }
}

/// Parse environment lines into entries, in file order.
pub fn parse_entries(content: &str) -> Vec<EnvTemplateEntry> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, raw_value)| EnvTemplateEntry {
            key: key.to_string(),
            raw_value: raw_value.to_string(),
        })
        .collect()
}

/// Parse an already-resolved `.env` file. Values are taken literally.
pub fn parse_env(content: &str) -> ResolvedEnvironment {
    parse_entries(content)
        .into_iter()
        .map(|entry| (entry.key, entry.raw_value))
        .collect()
}

/// Whether `key` survives a render/parse cycle unchanged.
///
/// Keys must be non-empty, must not start with whitespace or `#`, and must
/// not contain `=` or line breaks.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with(|c: char| c.is_whitespace() || c == '#')
        && !key.contains(['=', '\n', '\r'])
}

/// Whether `value` survives a render/parse cycle unchanged.
///
/// Values must not contain line breaks or end with whitespace.
pub fn is_valid_value(value: &str) -> bool {
    !value.contains(['\n', '\r']) && value.trim_end() == value
}

/// Final key to value mapping, in template order.
///
/// Inserting an existing key replaces its value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedEnvironment {
    entries: Vec<(String, String)>,
}

impl ResolvedEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// First entry whose key or value would not parse back unchanged.
    pub fn find_invalid(&self) -> Option<(&str, &str)> {
        self.iter()
            .find(|(key, value)| !is_valid_key(key) || !is_valid_value(value))
    }

    /// Render as `.env` content: one `key=value\n` line per key.
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries.iter().cloned().collect()
    }
}

impl fmt::Display for ResolvedEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResolvedEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::new();
        for (key, value) in iter {
            env.insert(key, value);
        }
        env
    }
}

impl Serialize for ResolvedEnvironment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for ResolvedEnvironment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, String>::deserialize(deserializer)?;
        Ok(map.into_iter().collect())
    }
}
