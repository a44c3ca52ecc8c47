//! Integration tests for module lifecycle orchestration.
//!
//! All container work goes through a `MockRunner`, so these tests need
//! neither Docker nor Podman.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use dockyard_core::{
    Configuration, CoreError, ErrorKind, ModuleConfig, ModuleStatus, Orchestrator,
    UNKNOWN_TEMPLATE,
};
use dockyard_runner::{ComposeTool, MockResponse, MockRunner, RunnerError};
use dockyard_templates::{MapValueSource, ScriptedValueSource};
use tempfile::{tempdir, TempDir};

const WEB_COMPOSE: &str = "services:\n  web:\n    image: nginx\n    env_file: .env\n";
const DB_COMPOSE: &str = "services:\n  db:\n    image: postgres:16\n";

struct Fixture {
    temp: TempDir,
    runner: MockRunner,
    orchestrator: Orchestrator,
}

impl Fixture {
    fn new(runner: MockRunner) -> Self {
        let temp = tempdir().unwrap();
        let root = temp.path();
        write_template(root, "web", WEB_COMPOSE, "PORT=<port>\nDEBUG=false");
        write_template(root, "db", DB_COMPOSE, "USER=<user>\nPASSWORD=<password>\nADMIN=<user>\n");

        let config = Configuration::new()
            .templates_dir(root.join("templates"))
            .compose_dir(root.join("compose"))
            .backups_dir(root.join("backups"))
            .compose_tool(ComposeTool::DockerPlugin)
            .command_timeout(42);
        fs::create_dir_all(&config.compose_dir).unwrap();

        let orchestrator = Orchestrator::new(Arc::new(config), Arc::new(runner.clone()));
        Self {
            temp,
            runner,
            orchestrator,
        }
    }

    fn module_dir(&self, name: &str) -> std::path::PathBuf {
        self.temp.path().join("compose").join(name)
    }
}

fn write_template(root: &Path, name: &str, compose: &str, env_template: &str) {
    let dir = root.join("templates").join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("docker-compose.yml"), compose).unwrap();
    fs::write(dir.join(".env.template"), env_template).unwrap();
}

#[tokio::test]
async fn test_dock_web_example() {
    let fx = Fixture::new(MockRunner::new().add_response(MockResponse::success("Started")));
    let mut answers = ScriptedValueSource::new(["8080"]);

    let report = fx
        .orchestrator
        .dock(&ModuleConfig::new("web", "web"), &mut answers)
        .await
        .unwrap();

    let dir = fx.module_dir("web");
    assert_eq!(fs::read_to_string(dir.join(".env")).unwrap(), "PORT=8080\nDEBUG=false\n");
    assert_eq!(fs::read_to_string(dir.join("docker-compose.yml")).unwrap(), WEB_COMPOSE);
    assert_eq!(report.output, "Started");
    assert_eq!(answers.prompts(), ["port"]);

    let calls = fx.runner.get_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "docker");
    assert_eq!(calls[0].args_line(), "compose -p web up -d");
    assert_eq!(calls[0].workdir.as_deref(), Some(dir.as_path()));
    assert_eq!(calls[0].options.timeout_seconds, 42);
}

#[tokio::test]
async fn test_dock_shared_placeholder_prompted_once() {
    let fx = Fixture::new(MockRunner::new());
    let mut answers = ScriptedValueSource::new(["admin", "pw"]);

    let report = fx
        .orchestrator
        .dock(&ModuleConfig::new("pg", "db"), &mut answers)
        .await
        .unwrap();

    assert_eq!(answers.prompts(), ["user", "password"]);
    assert_eq!(report.env.get("USER"), Some("admin"));
    assert_eq!(report.env.get("ADMIN"), Some("admin"));
    assert_eq!(report.env.get("PASSWORD"), Some("pw"));
}

#[tokio::test]
async fn test_dock_with_presupplied_env_skips_resolution() {
    let fx = Fixture::new(MockRunner::new());
    let mut answers = ScriptedValueSource::default();
    let request = ModuleConfig::new("web", "web").with_env_var("PORT", "9000");

    fx.orchestrator.dock(&request, &mut answers).await.unwrap();

    assert!(answers.prompts().is_empty());
    assert_eq!(
        fs::read_to_string(fx.module_dir("web").join(".env")).unwrap(),
        "PORT=9000\n"
    );
}

#[tokio::test]
async fn test_dock_rejects_line_break_in_supplied_value() {
    let fx = Fixture::new(MockRunner::new());
    let request = ModuleConfig::new("web", "web").with_env_var("PORT", "80\nX=1");

    let err = fx
        .orchestrator
        .dock(&request, &mut MapValueSource::empty())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::InvalidEnvValue(ref key) if key == "PORT"));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(!fx.module_dir("web").join(".env").exists());
    assert_eq!(fx.runner.call_count(), 0);
}

#[tokio::test]
async fn test_dock_rejects_injected_keys() {
    let fx = Fixture::new(MockRunner::new());
    let request = ModuleConfig::new("web", "web")
        .with_env_var("PORT", "80\nCOMPOSE_FILE=/etc/evil.yml")
        .with_env_var("A=B", "x");

    let err = fx
        .orchestrator
        .dock(&request, &mut MapValueSource::empty())
        .await
        .unwrap_err();

    // keys are checked in order, so "A=B" is reported first
    assert!(matches!(err, CoreError::InvalidEnvKey(ref key) if key == "A=B"));
    assert!(!fx.module_dir("web").exists());
    assert_eq!(fx.runner.call_count(), 0);
}

#[tokio::test]
async fn test_redock_keeps_previous_env_when_rejected() {
    let fx = Fixture::new(MockRunner::new());
    fx.orchestrator
        .dock(&ModuleConfig::new("web", "web"), &mut ScriptedValueSource::new(["80"]))
        .await
        .unwrap();

    let request = ModuleConfig::new("web", "web").with_env_var("#PORT", "1");
    assert!(fx
        .orchestrator
        .dock(&request, &mut MapValueSource::empty())
        .await
        .is_err());

    assert_eq!(
        fs::read_to_string(fx.module_dir("web").join(".env")).unwrap(),
        "PORT=80\nDEBUG=false\n"
    );
}

#[tokio::test]
async fn test_docked_env_reads_back_unchanged() {
    let fx = Fixture::new(MockRunner::new());
    let request = ModuleConfig::new("web", "web")
        .with_env_var("DATABASE_URL", "postgres://u:p@db/app?sslmode=disable")
        .with_env_var("GREETING", " hello world");

    let report = fx
        .orchestrator
        .dock(&request, &mut MapValueSource::empty())
        .await
        .unwrap();

    let module = fx.orchestrator.modules().get("web").unwrap();
    assert_eq!(module.env_config, report.env);
}

#[tokio::test]
async fn test_redock_overwrites_files() {
    let fx = Fixture::new(MockRunner::new());

    fx.orchestrator
        .dock(&ModuleConfig::new("web", "web"), &mut ScriptedValueSource::new(["80"]))
        .await
        .unwrap();
    fs::write(fx.module_dir("web").join("docker-compose.yml"), "edited").unwrap();

    fx.orchestrator
        .dock(&ModuleConfig::new("web", "web"), &mut ScriptedValueSource::new(["81"]))
        .await
        .unwrap();

    let dir = fx.module_dir("web");
    assert_eq!(fs::read_to_string(dir.join(".env")).unwrap(), "PORT=81\nDEBUG=false\n");
    assert_eq!(fs::read_to_string(dir.join("docker-compose.yml")).unwrap(), WEB_COMPOSE);
    assert_eq!(fx.runner.call_count(), 2);
}

#[tokio::test]
async fn test_dock_unknown_template_is_not_found() {
    let fx = Fixture::new(MockRunner::new());

    let err = fx
        .orchestrator
        .dock(&ModuleConfig::new("x", "nope"), &mut MapValueSource::empty())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!fx.module_dir("x").exists());
    assert_eq!(fx.runner.call_count(), 0);
}

#[tokio::test]
async fn test_dock_failure_carries_tool_output() {
    let fx = Fixture::new(
        MockRunner::new().add_response(MockResponse::failure(1, "port is already allocated")),
    );

    let err = fx
        .orchestrator
        .dock(&ModuleConfig::new("web", "web"), &mut ScriptedValueSource::new(["80"]))
        .await
        .unwrap_err();

    match err {
        CoreError::Runner(RunnerError::CommandFailed { exit_code, output, .. }) => {
            assert_eq!(exit_code, 1);
            assert!(output.contains("port is already allocated"));
        }
        other => panic!("unexpected error: {other}"),
    }
    // files are written before the tool runs
    assert!(fx.module_dir("web").join(".env").exists());
}

#[tokio::test]
async fn test_dock_rejects_path_traversal() {
    let fx = Fixture::new(MockRunner::new());

    let err = fx
        .orchestrator
        .dock(&ModuleConfig::new("../escape", "web"), &mut MapValueSource::empty())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(fx.runner.call_count(), 0);
}

#[tokio::test]
async fn test_down_missing_module_never_invokes_tool() {
    let fx = Fixture::new(MockRunner::new());

    let err = fx.orchestrator.down("ghost").await.unwrap_err();

    assert!(matches!(err, CoreError::ModuleNotFound(ref n) if n == "ghost"));
    assert_eq!(fx.runner.call_count(), 0);

    for result in [
        fx.orchestrator.logs("ghost").await.map(|_| ()),
        fx.orchestrator.restart("ghost").await.map(|_| ()),
        fx.orchestrator.status("ghost").await.map(|_| ()),
    ] {
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }
    assert_eq!(fx.runner.call_count(), 0);
}

#[tokio::test]
async fn test_down_keeps_module_files() {
    let fx = Fixture::new(MockRunner::new());
    fx.orchestrator
        .dock(&ModuleConfig::new("web", "web"), &mut ScriptedValueSource::new(["80"]))
        .await
        .unwrap();
    fx.runner.clear_calls();

    fx.orchestrator.down("web").await.unwrap();

    assert_eq!(fx.runner.get_calls()[0].args_line(), "compose -p web down");
    assert!(fx.module_dir("web").join("docker-compose.yml").exists());
    assert!(fx.module_dir("web").join(".env").exists());
}

#[tokio::test]
async fn test_restart_runs_down_then_up() {
    let fx = Fixture::new(MockRunner::new());
    fs::create_dir_all(fx.module_dir("web")).unwrap();

    fx.orchestrator.restart("web").await.unwrap();

    let lines: Vec<String> = fx.runner.get_calls().iter().map(|c| c.args_line()).collect();
    assert_eq!(lines, vec!["compose -p web down", "compose -p web up -d"]);
}

#[tokio::test]
async fn test_restart_stops_when_down_fails() {
    let fx = Fixture::new(MockRunner::new().add_response(MockResponse::failure(1, "daemon down")));
    fs::create_dir_all(fx.module_dir("web")).unwrap();

    let err = fx.orchestrator.restart("web").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ExternalTool);
    assert_eq!(fx.runner.call_count(), 1);
    assert!(fx.runner.calls_containing("up -d").is_empty());
}

#[tokio::test]
async fn test_restart_reports_up_failure() {
    let fx = Fixture::new(MockRunner::new().with_responses(vec![
        MockResponse::success("stopped"),
        MockResponse::failure(2, "bad image"),
    ]));
    fs::create_dir_all(fx.module_dir("web")).unwrap();

    let err = fx.orchestrator.restart("web").await.unwrap_err();

    assert!(err.to_string().contains("bad image"));
    assert_eq!(fx.runner.call_count(), 2);
}

#[tokio::test]
async fn test_logs_follow_is_streamed_without_timeout() {
    let fx = Fixture::new(MockRunner::new());
    fs::create_dir_all(fx.module_dir("web")).unwrap();

    fx.orchestrator.logs("web").await.unwrap();

    let call = &fx.runner.get_calls()[0];
    assert_eq!(call.args_line(), "compose -p web logs -f");
    assert!(call.options.stream_output);
    assert_eq!(call.options.timeout_seconds, 0);
}

#[tokio::test]
async fn test_logs_tail_is_captured() {
    let fx = Fixture::new(MockRunner::new().add_response(MockResponse::success("web-1 | ready")));
    fs::create_dir_all(fx.module_dir("web")).unwrap();

    let logs = fx.orchestrator.logs_tail("web", 20).await.unwrap();

    assert_eq!(logs, "web-1 | ready");
    assert_eq!(fx.runner.get_calls()[0].args_line(), "compose -p web logs --tail 20");
}

#[tokio::test]
async fn test_list_streams_engine_ps() {
    let fx = Fixture::new(MockRunner::new());

    fx.orchestrator.list().await.unwrap();

    let call = &fx.runner.get_calls()[0];
    assert_eq!(call.program, "docker");
    assert_eq!(call.args, vec!["ps"]);
    assert!(call.options.stream_output);
    assert!(call.options.timeout_seconds > 0);
}

#[tokio::test]
async fn test_status_from_container_ids() {
    let fx = Fixture::new(MockRunner::new().with_responses(vec![
        MockResponse::success("3f2a1b\n9c8d7e\n"),
        MockResponse::success("\n"),
    ]));
    fs::create_dir_all(fx.module_dir("web")).unwrap();

    assert_eq!(fx.orchestrator.status("web").await.unwrap(), ModuleStatus::Running);
    assert_eq!(fx.orchestrator.status("web").await.unwrap(), ModuleStatus::Stopped);
}

#[tokio::test]
async fn test_timeout_and_forbidden_surface_as_kinds() {
    let fx = Fixture::new(MockRunner::new().simulate_timeout(42));
    fs::create_dir_all(fx.module_dir("web")).unwrap();
    assert_eq!(fx.orchestrator.down("web").await.unwrap_err().kind(), ErrorKind::Timeout);

    let fx = Fixture::new(MockRunner::new().simulate_forbidden());
    fs::create_dir_all(fx.module_dir("web")).unwrap();
    assert_eq!(fx.orchestrator.down("web").await.unwrap_err().kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_list_modules_attributes_templates() {
    let fx = Fixture::new(MockRunner::new());
    fx.orchestrator
        .dock(&ModuleConfig::new("site", "web"), &mut ScriptedValueSource::new(["80"]))
        .await
        .unwrap();

    let custom = fx.module_dir("custom");
    fs::create_dir_all(&custom).unwrap();
    fs::write(custom.join("docker-compose.yml"), "services:\n  redis:\n    image: redis\n").unwrap();
    fs::create_dir_all(fx.module_dir("not-a-module")).unwrap();

    let modules = fx.orchestrator.list_modules().unwrap();
    let names: HashSet<_> = modules.iter().map(|m| m.name.clone()).collect();
    assert_eq!(names, HashSet::from(["site".to_string(), "custom".to_string()]));

    let site = modules.iter().find(|m| m.name == "site").unwrap();
    assert_eq!(site.template, "web");
    assert_eq!(site.env_config.get("PORT"), Some("80"));
    assert_eq!(site.status, ModuleStatus::Unknown);

    let custom = modules.iter().find(|m| m.name == "custom").unwrap();
    assert_eq!(custom.template, UNKNOWN_TEMPLATE);
    assert!(custom.env_config.is_empty());

    let again: HashSet<_> = fx
        .orchestrator
        .list_modules()
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, again);
}

#[tokio::test]
async fn test_list_templates() {
    let fx = Fixture::new(MockRunner::new());

    let mut templates = fx.orchestrator.list_templates().unwrap();
    templates.sort();

    assert_eq!(templates, vec!["db", "web"]);
}

#[tokio::test]
async fn test_update_env_var_rewrites_one_key() {
    let fx = Fixture::new(MockRunner::new());
    fx.orchestrator
        .dock(&ModuleConfig::new("web", "web"), &mut ScriptedValueSource::new(["80"]))
        .await
        .unwrap();

    fx.orchestrator.update_env_var("web", "PORT", "8081").unwrap();
    fx.orchestrator.update_env_var("web", "LOG_LEVEL", "debug").unwrap();

    assert_eq!(
        fs::read_to_string(fx.module_dir("web").join(".env")).unwrap(),
        "PORT=8081\nDEBUG=false\nLOG_LEVEL=debug\n"
    );
    assert!(matches!(
        fx.orchestrator.update_env_var("web", "A=B", "x"),
        Err(CoreError::InvalidEnvKey(_))
    ));
    assert!(matches!(
        fx.orchestrator.update_env_var("web", "PORT", "1\nCOMPOSE_FILE=/etc/evil.yml"),
        Err(CoreError::InvalidEnvValue(_))
    ));
    assert_eq!(
        fs::read_to_string(fx.module_dir("web").join(".env")).unwrap(),
        "PORT=8081\nDEBUG=false\nLOG_LEVEL=debug\n"
    );
    assert!(matches!(
        fx.orchestrator.update_env_var("ghost", "A", "x"),
        Err(CoreError::ModuleNotFound(_))
    ));
}

#[tokio::test]
async fn test_backup_and_restore_module_files() {
    let fx = Fixture::new(MockRunner::new());
    fx.orchestrator
        .dock(&ModuleConfig::new("web", "web"), &mut ScriptedValueSource::new(["80"]))
        .await
        .unwrap();

    let backup = fx.orchestrator.backup("web").unwrap();
    fx.orchestrator.update_env_var("web", "PORT", "1").unwrap();
    fs::remove_file(fx.module_dir("web").join("docker-compose.yml")).unwrap();

    fx.orchestrator.restore("web", &backup.name).unwrap();

    let dir = fx.module_dir("web");
    assert_eq!(fs::read_to_string(dir.join(".env")).unwrap(), "PORT=80\nDEBUG=false\n");
    assert_eq!(fs::read_to_string(dir.join("docker-compose.yml")).unwrap(), WEB_COMPOSE);
    assert_eq!(fx.orchestrator.list_backups("web").unwrap().len(), 1);
    assert_eq!(fx.runner.call_count(), 1);

    let err = fx.orchestrator.restore("web", "19990101T000000").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
