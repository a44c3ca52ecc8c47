//! Docked module discovery.

use std::fs;
use std::path::{Path, PathBuf};

use dockyard_templates::{
    compose_dirs, parse_env, validate_name, ResolvedEnvironment, TemplateRegistry, COMPOSE_FILE,
    ENV_FILE,
};
use tracing::{debug, warn};

use crate::config::Configuration;
use crate::error::{CoreError, CoreResult};
use crate::models::{Module, ModuleStatus, UNKNOWN_TEMPLATE};

/// Module repository rooted at the compose directory.
#[derive(Debug, Clone)]
pub struct ModuleRepository {
    compose_dir: PathBuf,
    templates: TemplateRegistry,
}

impl ModuleRepository {
    pub fn new(config: &Configuration) -> Self {
        Self {
            compose_dir: config.compose_dir.clone(),
            templates: TemplateRegistry::new(config.templates_dir.clone()),
        }
    }

    pub fn module_dir(&self, name: &str) -> PathBuf {
        self.compose_dir.join(name)
    }

    /// Whether a directory named `name` exists under the compose directory.
    pub fn exists(&self, name: &str) -> bool {
        validate_name("module", name).is_ok() && self.module_dir(name).is_dir()
    }

    /// Fail with [`CoreError::ModuleNotFound`] unless the module directory exists.
    pub fn require(&self, name: &str) -> CoreResult<PathBuf> {
        validate_name("module", name)?;
        let dir = self.module_dir(name);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(CoreError::ModuleNotFound(name.to_string()))
        }
    }

    /// All modules (directories holding a compose file), in enumeration order.
    pub fn list(&self) -> CoreResult<Vec<Module>> {
        let names = compose_dirs(&self.compose_dir)?;
        let templates = self.template_composes();

        Ok(names
            .into_iter()
            .map(|name| self.load(name, &templates))
            .collect())
    }

    /// A single module. The directory must hold a compose file.
    pub fn get(&self, name: &str) -> CoreResult<Module> {
        let dir = self.require(name)?;
        if !dir.join(COMPOSE_FILE).is_file() {
            return Err(CoreError::ModuleNotFound(name.to_string()));
        }
        Ok(self.load(name.to_string(), &self.template_composes()))
    }

    /// Read the module's `.env`; a missing or unreadable file yields an empty mapping.
    pub fn read_env(&self, name: &str) -> ResolvedEnvironment {
        let path = self.module_dir(name).join(ENV_FILE);
        match fs::read_to_string(&path) {
            Ok(content) => parse_env(&content),
            Err(e) => {
                debug!("No environment for module {}: {}", name, e);
                ResolvedEnvironment::new()
            }
        }
    }

    fn load(&self, name: String, templates: &[(String, String)]) -> Module {
        let compose_path = self.module_dir(&name).join(COMPOSE_FILE);
        let template = attribute_template(&compose_path, templates);
        let env_config = self.read_env(&name);

        Module {
            name,
            template,
            env_config,
            status: ModuleStatus::Unknown,
        }
    }

    /// (name, compose content) for every readable template.
    fn template_composes(&self) -> Vec<(String, String)> {
        let names = match self.templates.list() {
            Ok(names) => names,
            Err(e) => {
                warn!("Cannot list templates for attribution: {}", e);
                return Vec::new();
            }
        };

        names
            .into_iter()
            .filter_map(|name| {
                let content = fs::read_to_string(self.templates.compose_path(&name)).ok()?;
                Some((name, content))
            })
            .collect()
    }
}

/// Best-effort attribution: the first template whose compose content
/// contains, or is contained in, the module's compose content.
fn attribute_template(compose_path: &Path, templates: &[(String, String)]) -> String {
    let Ok(module_compose) = fs::read_to_string(compose_path) else {
        return UNKNOWN_TEMPLATE.to_string();
    };

    templates
        .iter()
        .find(|(_, template_compose)| {
            module_compose.contains(template_compose.as_str())
                || template_compose.contains(module_compose.as_str())
        })
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| UNKNOWN_TEMPLATE.to_string())
}
