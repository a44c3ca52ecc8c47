//! Environment template resolution.

use std::collections::HashMap;

use tracing::debug;

use crate::envfile::{parse_entries, EnvTemplateEntry, EnvValue, ResolvedEnvironment};
use crate::error::TemplateResult;
use crate::source::ValueSource;

/// Turns an environment template into a [`ResolvedEnvironment`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvResolver;

impl EnvResolver {
    pub fn new() -> Self {
        Self
    }

    /// Distinct placeholder names, in order of first occurrence.
    pub fn placeholder_names(entries: &[EnvTemplateEntry]) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in entries.iter().filter_map(EnvTemplateEntry::placeholder) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Resolve `template` asking `source` once per distinct placeholder name.
    ///
    /// An empty answer keeps the literal `<name>` text in the output.
    pub fn resolve(
        &self,
        template: &str,
        source: &mut dyn ValueSource,
    ) -> TemplateResult<ResolvedEnvironment> {
        let entries = parse_entries(template);

        let mut values: HashMap<&str, String> = HashMap::new();
        for name in Self::placeholder_names(&entries) {
            let answer = source.value_for(name)?;
            let value = if answer.is_empty() {
                debug!("No value for <{}>, keeping placeholder", name);
                format!("<{}>", name)
            } else {
                answer
            };
            values.insert(name, value);
        }

        let mut env = ResolvedEnvironment::new();
        for entry in &entries {
            match entry.value() {
                EnvValue::Literal(value) => env.insert(entry.key.as_str(), value),
                EnvValue::Placeholder(name) => {
                    let value = values.get(name).map(String::as_str).unwrap_or_default();
                    env.insert(entry.key.as_str(), value)
                }
            }
        }

        Ok(env)
    }
}
