//! Template discovery.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{TemplateError, TemplateResult};
use crate::names::validate_name;

/// Compose descriptor file name.
pub const COMPOSE_FILE: &str = "docker-compose.yml";
/// Preferred environment template file name.
pub const ENV_TEMPLATE_FILE: &str = ".env.template";
/// Environment file name (template fallback, and a module's resolved env).
pub const ENV_FILE: &str = ".env";

/// Lists immediate subdirectories of `dir` that directly contain a compose file.
///
/// Shared by template and module enumeration. Fails only when `dir` itself
/// cannot be read.
pub fn compose_dirs(dir: &Path) -> TemplateResult<Vec<String>> {
    let mut names = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }
        if !entry.path().join(COMPOSE_FILE).is_file() {
            debug!("Skipping {:?}: no {}", entry.path(), COMPOSE_FILE);
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }

    Ok(names)
}

/// Template registry rooted at the templates directory.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates_path: PathBuf,
}

impl TemplateRegistry {
    pub fn new(templates_path: impl Into<PathBuf>) -> Self {
        Self {
            templates_path: templates_path.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.templates_path
    }

    /// Names of all templates, in directory enumeration order.
    pub fn list(&self) -> TemplateResult<Vec<String>> {
        compose_dirs(&self.templates_path)
    }

    /// Whether `name` is a template (its directory holds a compose file).
    pub fn exists(&self, name: &str) -> bool {
        validate_name("template", name).is_ok() && self.compose_path(name).is_file()
    }

    /// Get the path to a template directory.
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.templates_path.join(name)
    }

    pub fn compose_path(&self, name: &str) -> PathBuf {
        self.template_path(name).join(COMPOSE_FILE)
    }

    /// `.env.template` if present, else `.env`.
    pub fn env_template_path(&self, name: &str) -> Option<PathBuf> {
        let dir = self.template_path(name);
        [ENV_TEMPLATE_FILE, ENV_FILE]
            .iter()
            .map(|file| dir.join(file))
            .find(|path| path.is_file())
    }

    /// Check that `name` is a usable template.
    pub fn require(&self, name: &str) -> TemplateResult<()> {
        validate_name("template", name)?;
        if self.exists(name) {
            Ok(())
        } else {
            Err(TemplateError::NotFound(name.to_string()))
        }
    }

    pub fn read_compose(&self, name: &str) -> TemplateResult<String> {
        self.require(name)?;
        Ok(fs::read_to_string(self.compose_path(name))?)
    }

    pub fn read_env_template(&self, name: &str) -> TemplateResult<String> {
        self.require(name)?;
        let path = self
            .env_template_path(name)
            .ok_or_else(|| TemplateError::MissingEnvTemplate(name.to_string()))?;
        debug!("Reading environment template {:?}", path);
        Ok(fs::read_to_string(path)?)
    }
}
