//! Module lifecycle orchestration.
//!
//! Every operation is scoped to a module directory under the compose
//! directory and delegates container work to the compose tool through a
//! [`CommandRunner`].

use std::fs;
use std::sync::Arc;

use dockyard_runner::{CommandRunner, CommandSpec, ComposeTool, ExecOptions, ExecutionResult};
use dockyard_templates::{
    is_valid_key, is_valid_value, parse_env, validate_name, EnvResolver, ResolvedEnvironment,
    TemplateRegistry, ValueSource, COMPOSE_FILE, ENV_FILE,
};
use tracing::{debug, info, warn};

use crate::backup::BackupStore;
use crate::config::Configuration;
use crate::error::{CoreError, CoreResult};
use crate::models::{BackupInfo, DockReport, Module, ModuleConfig, ModuleStatus};
use crate::repository::ModuleRepository;

/// Drives dock / list / logs / down / restart and the module maintenance
/// operations.
pub struct Orchestrator {
    config: Arc<Configuration>,
    runner: Arc<dyn CommandRunner>,
    tool: ComposeTool,
    templates: TemplateRegistry,
    modules: ModuleRepository,
    backups: BackupStore,
}

impl Orchestrator {
    /// Create an orchestrator. An unset compose tool falls back to `docker compose`.
    pub fn new(config: Arc<Configuration>, runner: Arc<dyn CommandRunner>) -> Self {
        let tool = config.compose_tool.unwrap_or_default();
        Self {
            templates: TemplateRegistry::new(config.templates_dir.clone()),
            modules: ModuleRepository::new(&config),
            backups: BackupStore::new(config.backups_dir.clone()),
            tool,
            runner,
            config,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn compose_tool(&self) -> ComposeTool {
        self.tool
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn modules(&self) -> &ModuleRepository {
        &self.modules
    }

    /// Template names, in directory enumeration order.
    pub fn list_templates(&self) -> CoreResult<Vec<String>> {
        Ok(self.templates.list()?)
    }

    /// Docked modules found on disk.
    pub fn list_modules(&self) -> CoreResult<Vec<Module>> {
        self.modules.list()
    }

    fn compose(&self, module: &str, args: &[&str]) -> CommandSpec {
        self.tool
            .project_command(module, args.iter().copied(), self.config.module_dir(module))
    }

    async fn run_checked(
        &self,
        command: &CommandSpec,
        options: &ExecOptions,
    ) -> CoreResult<ExecutionResult> {
        let result = self.runner.run(command, options).await?;
        Ok(result.ensure_success()?)
    }

    /// Instantiate `request.template` as module `request.name` and start it.
    ///
    /// Re-docking an existing module overwrites its compose file and `.env`.
    /// `source` is only consulted when the request carries no environment.
    /// An environment that would not read back unchanged from `.env` is
    /// rejected before anything is written.
    pub async fn dock(
        &self,
        request: &ModuleConfig,
        source: &mut dyn ValueSource,
    ) -> CoreResult<DockReport> {
        let name = request.name.as_str();
        let template = request.template.as_str();
        info!("Docking module {} using template {}", name, template);

        validate_name("module", name)?;
        self.templates.require(template)?;

        let env = match request.environment() {
            Some(env) => {
                debug!("Using {} pre-supplied variables", env.len());
                env
            }
            None => {
                let content = self.templates.read_env_template(template)?;
                EnvResolver::new().resolve(&content, source)?
            }
        };
        check_env(&env)?;

        let module_dir = self.config.module_dir(name);
        fs::create_dir_all(&module_dir)?;
        fs::copy(
            self.templates.compose_path(template),
            module_dir.join(COMPOSE_FILE),
        )?;
        fs::write(module_dir.join(ENV_FILE), env.render())?;

        let result = self.up(name).await?;
        info!("Module {} started successfully", name);

        Ok(DockReport {
            module: name.to_string(),
            template: template.to_string(),
            module_dir,
            env,
            output: result.combined_output(),
        })
    }

    async fn up(&self, name: &str) -> CoreResult<ExecutionResult> {
        let command = self.compose(name, &["up", "-d"]);
        self.run_checked(&command, &self.config.exec_options()).await
    }

    /// List running containers, streaming the tool's output.
    pub async fn list(&self) -> CoreResult<()> {
        let command = self.tool.ps_command();
        self.run_checked(&command, &self.config.exec_options().stream())
            .await?;
        Ok(())
    }

    /// Follow a module's logs until the process is interrupted.
    pub async fn logs(&self, name: &str) -> CoreResult<()> {
        self.modules.require(name)?;
        let command = self.compose(name, &["logs", "-f"]);
        self.run_checked(&command, &ExecOptions::new().stream().unbounded())
            .await?;
        Ok(())
    }

    /// The last `tail` log lines of a module, captured.
    pub async fn logs_tail(&self, name: &str, tail: usize) -> CoreResult<String> {
        self.modules.require(name)?;
        let tail = tail.to_string();
        let command = self.compose(name, &["logs", "--tail", tail.as_str()]);
        let result = self
            .run_checked(&command, &self.config.exec_options())
            .await?;
        Ok(result.combined_output())
    }

    /// Stop and remove a module's containers. Files are kept.
    pub async fn down(&self, name: &str) -> CoreResult<ExecutionResult> {
        self.modules.require(name)?;
        info!("Stopping module {}", name);
        let command = self.compose(name, &["down"]);
        self.run_checked(&command, &self.config.exec_options()).await
    }

    /// `down` then `up -d`. Stops at the first failing phase; no rollback.
    pub async fn restart(&self, name: &str) -> CoreResult<ExecutionResult> {
        self.modules.require(name)?;
        info!("Restarting module {}", name);

        let down = self.compose(name, &["down"]);
        if let Err(e) = self.run_checked(&down, &self.config.exec_options()).await {
            warn!("Restart of {} aborted: down failed", name);
            return Err(e);
        }

        let result = self.up(name).await?;
        info!("Module {} restarted successfully", name);
        Ok(result)
    }

    /// Ask the compose tool whether any of the module's containers run.
    pub async fn status(&self, name: &str) -> CoreResult<ModuleStatus> {
        self.modules.require(name)?;
        let command = self.compose(name, &["ps", "-q"]);
        let result = self
            .run_checked(&command, &self.config.exec_options())
            .await?;

        if result.stdout.lines().any(|line| !line.trim().is_empty()) {
            Ok(ModuleStatus::Running)
        } else {
            Ok(ModuleStatus::Stopped)
        }
    }

    /// Set one key in a module's `.env`, appending it if absent.
    pub fn update_env_var(
        &self,
        name: &str,
        key: &str,
        value: &str,
    ) -> CoreResult<ResolvedEnvironment> {
        let dir = self.modules.require(name)?;
        check_entry(key, value)?;

        let path = dir.join(ENV_FILE);
        let mut env = match fs::read_to_string(&path) {
            Ok(content) => parse_env(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ResolvedEnvironment::new(),
            Err(e) => return Err(e.into()),
        };
        env.insert(key, value);
        fs::write(&path, env.render())?;

        info!("Updated {} in module {}", key, name);
        Ok(env)
    }

    pub fn backup(&self, name: &str) -> CoreResult<BackupInfo> {
        let dir = self.modules.require(name)?;
        self.backups.create(name, &dir)
    }

    pub fn list_backups(&self, name: &str) -> CoreResult<Vec<BackupInfo>> {
        validate_name("module", name)?;
        self.backups.list(name)
    }

    /// Restore module files from a backup. Containers are not touched.
    pub fn restore(&self, name: &str, backup: &str) -> CoreResult<BackupInfo> {
        validate_name("module", name)?;
        self.backups.restore(name, backup, &self.config.module_dir(name))
    }
}

/// Reject entries that would not read back unchanged from a `.env` file.
fn check_entry(key: &str, value: &str) -> CoreResult<()> {
    if !is_valid_key(key) {
        return Err(CoreError::InvalidEnvKey(key.to_string()));
    }
    if !is_valid_value(value) {
        return Err(CoreError::InvalidEnvValue(key.to_string()));
    }
    Ok(())
}

fn check_env(env: &ResolvedEnvironment) -> CoreResult<()> {
    match env.find_invalid() {
        Some((key, value)) => check_entry(key, value),
        None => Ok(()),
    }
}
