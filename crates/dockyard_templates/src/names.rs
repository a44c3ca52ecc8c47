//! Name validation for templates and modules.
//!
//! Names become directory names and compose project names, so they must be
//! a single path component.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{TemplateError, TemplateResult};

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("name pattern is valid")
    })
}

/// Check that `name` is usable as a `kind` ("module", "template", ...) name.
pub fn validate_name(kind: &'static str, name: &str) -> TemplateResult<()> {
    if name_pattern().is_match(name) && !name.contains("..") {
        Ok(())
    } else {
        Err(TemplateError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}
